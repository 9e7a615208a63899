//! `bitgugs update` -- append an arbitrary field to an issue.

use anyhow::Result;

use bitgugs_core::record;
use bitgugs_ui::styles::{render_field, render_id};

use super::Change;
use crate::cli::UpdateArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bitgugs update` command.
pub fn run(ctx: &RuntimeContext, args: &UpdateArgs) -> Result<Change> {
    let path = ctx.store.resolve(&args.id)?;
    let value = args.value.join(" ");
    record::append(&path, &record::format_field(&args.field, &value)?)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "id": args.id,
            "field": args.field,
            "value": value,
        }))?;
    } else {
        println!(
            "Updated {}: {} = {}",
            render_id(&args.id),
            render_field(&args.field),
            value
        );
    }

    Ok(Change {
        paths: vec![path],
        message: format!("{}: {} set to {}", args.id, args.field, value),
    })
}
