//! `bitgugs list` -- list issues matching a status and search query.

use anyhow::Result;

use bitgugs_core::Record;
use bitgugs_query::Expr;

use crate::cli::ListArgs;
use crate::context::RuntimeContext;
use crate::output::{IssueView, format_issue, output_json};

/// Execute the `bitgugs list` command.
///
/// Issues that cannot be parsed or lack a required field are skipped with
/// a warning.
pub fn run(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let status_query = match &args.status {
        Some(tokens) => Expr::parse(tokens),
        None => Expr::from_words(&ctx.config.list_status),
    };
    let search = Expr::parse(&args.search);
    tracing::debug!(status = %status_query, search = %search, "listing issues");

    let dir = ctx.store.ensure_directory()?;
    let mut listed: Vec<(String, Record)> = Vec::new();
    for name in ctx.store.list_all()? {
        let record = match Record::read(&dir.join(&name)).and_then(|r| r.check_required().map(|()| r)) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(file = %name, %err, "skipping issue");
                continue;
            }
        };

        let field = |key: &str| record.get(key).unwrap_or_default();
        if !status_query.matches(field("status")) {
            continue;
        }
        if !search.matches(field("title")) && !search.matches(field("description")) {
            continue;
        }
        listed.push((name, record));
    }

    if ctx.json {
        let views: Vec<IssueView<'_>> = listed
            .iter()
            .map(|(name, record)| IssueView::new(name, record))
            .collect();
        output_json(&views)?;
    } else {
        for (_, record) in &listed {
            print!("{}", format_issue(record, args.quiet));
        }
    }
    Ok(())
}
