//! Command handlers, one module per subcommand.

pub mod commit;
pub mod completion;
pub mod config_cmd;
pub mod list;
pub mod new;
pub mod show;
pub mod take;
pub mod update;

use std::path::PathBuf;

use anyhow::{Context, Result};

use bitgugs_git::Vcs;

use crate::context::RuntimeContext;

/// Issue files touched by a command and the message to commit them with.
#[derive(Debug)]
pub struct Change {
    pub paths: Vec<PathBuf>,
    pub message: String,
}

/// Stages the changed files and commits them, together with anything the
/// user already had staged.
pub fn record_change(ctx: &RuntimeContext, change: &Change) -> Result<()> {
    for path in &change.paths {
        ctx.vcs
            .add(path)
            .with_context(|| format!("failed to stage {}", ctx.display_path(path)))?;
    }
    ctx.vcs
        .commit(&change.message)
        .with_context(|| format!("failed to commit {:?}", change.message))?;
    tracing::debug!(message = %change.message, "committed");
    Ok(())
}
