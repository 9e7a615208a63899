//! `bitgugs commit` -- record a code change on one or more issues and commit.

use anyhow::Result;

use bitgugs_core::record;

use super::{Change, record_change};
use crate::cli::CommitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bitgugs commit` command.
///
/// Every id is resolved before anything is written, so an unknown id leaves
/// all issues untouched.
pub fn run(ctx: &RuntimeContext, args: &CommitArgs) -> Result<()> {
    let ids: Vec<&str> = std::iter::once(args.id.as_str())
        .chain(args.ids.iter().map(String::as_str))
        .collect();
    let paths = ids
        .iter()
        .map(|id| ctx.store.resolve(id))
        .collect::<Result<Vec<_>, _>>()?;

    let message = args.message.join(" ");
    let mut fields = vec![("commit", message.as_str())];
    if let Some(status) = &args.status {
        fields.push(("status", status.as_str()));
    }
    let text = record::format_fields(fields)?;
    for path in &paths {
        record::append(path, &text)?;
    }

    let change = Change {
        paths,
        message: commit_message(&ids, &message, args.status.as_deref()),
    };
    record_change(ctx, &change)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "ids": ids,
            "message": change.message,
        }))?;
    } else {
        println!("Committed: {}", change.message);
    }
    Ok(())
}

/// `<id>[, <id>...]: <message>[ (<status>)]`
fn commit_message(ids: &[&str], message: &str, status: Option<&str>) -> String {
    let mut out = format!("{}: {message}", ids.join(", "));
    if let Some(status) = status {
        out.push_str(&format!(" ({status})"));
    }
    out
}
