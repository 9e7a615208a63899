//! `bitgugs take` -- assign an issue to the current git user.

use anyhow::{Context, Result};

use bitgugs_core::record;
use bitgugs_git::Vcs;
use bitgugs_ui::styles::{render_id, render_status};

use super::Change;
use crate::cli::TakeArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bitgugs take` command.
pub fn run(ctx: &RuntimeContext, args: &TakeArgs) -> Result<Change> {
    let path = ctx.store.resolve(&args.id)?;
    let who = ctx
        .vcs
        .user_identity()
        .context("cannot take an issue without a git identity")?;
    let status = args
        .status
        .as_deref()
        .unwrap_or(ctx.config.take_status.as_str());

    let text = record::format_fields([("assignee", who.as_str()), ("status", status)])?;
    record::append(&path, &text)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "id": args.id,
            "assignee": who,
            "status": status,
        }))?;
    } else {
        println!(
            "Took {} as {} ( {} )",
            render_id(&args.id),
            who,
            render_status(status)
        );
    }

    Ok(Change {
        paths: vec![path],
        message: format!("{}: taken by {who} ({status})", args.id),
    })
}
