//! Output formatting helpers for the `bitgugs` CLI.
//!
//! Provides JSON output plus the human-readable list and blame views.

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

use bitgugs_core::Record;
use bitgugs_git::blame::BlameGroup;
use bitgugs_ui::styles::{render_event_header, render_field, render_id, render_status};

/// Timestamp format of blame event headers.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fields shown on the summary line of `list` rather than below it.
const SUMMARY_FIELDS: [&str; 3] = ["id", "title", "status"];

/// JSON view of one issue.
#[derive(Serialize)]
pub struct IssueView<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub status: &'a str,
    /// File name inside the issue directory.
    pub file: &'a str,
    /// All fields in first-seen order with their latest values.
    pub fields: &'a Record,
}

impl<'a> IssueView<'a> {
    pub fn new(file: &'a str, record: &'a Record) -> Self {
        Self {
            id: record.get("id").unwrap_or_default(),
            title: record.get("title").unwrap_or_default(),
            status: record.get("status").unwrap_or_default(),
            file,
            fields: record,
        }
    }
}

/// Print a value as pretty-printed JSON to stdout.
pub fn output_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Ignore broken pipe errors (e.g., piped to `head`)
    let _ = writeln!(handle, "{json}");
    Ok(())
}

/// Renders one issue as `list` prints it.
///
/// The summary line is `<id> : <title> ( <status> )`. Unless `quiet`, every
/// other field follows as `<field> : <value>`, then a blank line.
pub fn format_issue(record: &Record, quiet: bool) -> String {
    let mut out = format!(
        "{} : {} ( {} )\n",
        render_id(record.get("id").unwrap_or_default()),
        record.get("title").unwrap_or_default(),
        render_status(record.get("status").unwrap_or_default()),
    );
    if !quiet {
        for field in record.iter() {
            if SUMMARY_FIELDS.contains(&field.name.as_str()) {
                continue;
            }
            out.push_str(&format!("{} : {}\n", render_field(&field.name), field.value));
        }
        out.push('\n');
    }
    out
}

/// Local time of a Unix timestamp, or the raw number if out of range.
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.with_timezone(&Local).format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Renders the blame view: one header per change event, its lines indented
/// below, events separated by blank lines.
pub fn format_blame(groups: &[BlameGroup]) -> String {
    let mut out = String::new();
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let header = format!("{}  {}", format_timestamp(group.timestamp), group.author);
        out.push_str(&render_event_header(&header));
        out.push('\n');
        for line in &group.lines {
            out.push_str(&format!("    {}: {}\n", render_field(&line.field), line.value));
        }
    }
    out
}
