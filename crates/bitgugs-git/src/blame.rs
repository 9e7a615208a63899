//! Field history of an issue file reconstructed from blame.
//!
//! Each physical record line is paired with whoever committed it and when.
//! For display, consecutive lines with the same (timestamp, author) are
//! grouped into one change event.

use std::path::Path;

use bitgugs_core::record::{self, RecordError};
use serde::Serialize;

use crate::commands::GitError;
use crate::vcs::{LineAttribution, Vcs};

/// Errors raised while reconstructing history.
#[derive(Debug, thiserror::Error)]
pub enum BlameError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// One record line with its attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlameEntry {
    /// Field name as written on the line; `+` for continuations.
    pub field: String,
    pub value: String,
    pub author: String,
    /// Commit time, seconds since the Unix epoch.
    pub timestamp: i64,
}

/// A field update shown inside a [`BlameGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlameLine {
    pub field: String,
    pub value: String,
}

/// Consecutive lines sharing one author and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlameGroup {
    pub author: String,
    pub timestamp: i64,
    pub lines: Vec<BlameLine>,
}

/// Converts line attributions into record entries, in file order.
///
/// Blank lines are skipped; a line without a `": "` separator is a
/// malformed-record error.
pub fn reconstruct(lines: Vec<LineAttribution>) -> Result<Vec<BlameEntry>, RecordError> {
    let mut entries = Vec::with_capacity(lines.len());
    for (idx, line) in lines.into_iter().enumerate() {
        if line.content.is_empty() {
            continue;
        }
        let (field, value) =
            record::split_line(&line.content).ok_or_else(|| RecordError::Malformed {
                line: idx + 1,
                text: line.content.clone(),
            })?;
        entries.push(BlameEntry {
            field: field.to_string(),
            value: value.to_string(),
            author: line.author,
            timestamp: line.time,
        });
    }
    Ok(entries)
}

/// Blames `path` through `vcs` and reconstructs its entries.
pub fn blame<V: Vcs + ?Sized>(vcs: &V, path: &Path) -> Result<Vec<BlameEntry>, BlameError> {
    let lines = vcs.blame(path)?;
    Ok(reconstruct(lines)?)
}

/// Groups consecutive entries with equal (timestamp, author).
///
/// Entries keep file order; two separate runs by the same author at the same
/// time stay separate groups.
pub fn group(entries: &[BlameEntry]) -> Vec<BlameGroup> {
    entries
        .chunk_by(|a, b| a.timestamp == b.timestamp && a.author == b.author)
        .map(|chunk| BlameGroup {
            author: chunk[0].author.clone(),
            timestamp: chunk[0].timestamp,
            lines: chunk
                .iter()
                .map(|e| BlameLine {
                    field: e.field.clone(),
                    value: e.value.clone(),
                })
                .collect(),
        })
        .collect()
}
