//! `bitgugs new` -- create a new issue.

use anyhow::Result;

use bitgugs_ui::styles::render_id;

use super::Change;
use crate::cli::NewArgs;
use crate::context::RuntimeContext;
use crate::editor;
use crate::output::output_json;

/// Decides the id of the new issue: `--id`, or the next free number.
///
/// Runs before `--commit` stashes local changes, so issue files that were
/// never committed still count, both for the next number and for the
/// uniqueness of an explicit id.
pub fn pick_id(ctx: &RuntimeContext, args: &NewArgs) -> Result<String> {
    match &args.id {
        Some(id) => {
            ctx.store.check_new_id(id)?;
            Ok(id.clone())
        }
        None => Ok(ctx.store.next_auto_id()?),
    }
}

/// Execute the `bitgugs new` command.
pub fn run(ctx: &RuntimeContext, args: &NewArgs, id: &str) -> Result<Change> {
    let status = args
        .status
        .as_deref()
        .unwrap_or(ctx.config.default_status.as_str());
    let path = ctx.store.create(id, &args.title, status)?;
    let title = args.title.join(" ");

    if ctx.json {
        output_json(&serde_json::json!({
            "id": id,
            "title": title,
            "status": status,
            "path": ctx.display_path(&path).to_string(),
        }))?;
    } else {
        println!("Created issue {}: {}", render_id(id), ctx.display_path(&path));
    }

    editor::open(&ctx.config.editor_command(), &path);

    Ok(Change {
        paths: vec![path],
        message: format!("{id}: {title} ({status})"),
    })
}
