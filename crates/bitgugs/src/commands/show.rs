//! `bitgugs show` -- display an issue file, or its field history.

use anyhow::{Context, Result, bail};

use bitgugs_core::Record;
use bitgugs_git::{Vcs, blame};

use crate::cli::ShowArgs;
use crate::context::RuntimeContext;
use crate::output::{IssueView, format_blame, output_json};

/// Execute the `bitgugs show` command.
pub fn run(ctx: &RuntimeContext, args: &ShowArgs) -> Result<()> {
    let path = ctx.store.resolve(&args.id)?;

    if args.meta {
        if !ctx.vcs.has_history(&path)? {
            bail!(
                "issue {} has no history yet: {} was never committed",
                args.id,
                ctx.display_path(&path)
            );
        }
        let entries = blame::blame(&ctx.vcs, &path)
            .with_context(|| format!("cannot reconstruct history of {}", ctx.display_path(&path)))?;
        let groups = blame::group(&entries);
        if ctx.json {
            output_json(&groups)?;
        } else {
            print!("{}", format_blame(&groups));
        }
        return Ok(());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", ctx.display_path(&path)))?;
    let record = Record::parse(&text)
        .with_context(|| format!("malformed issue file {}", ctx.display_path(&path)))?;

    if ctx.json {
        let file = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        output_json(&IssueView::new(file, &record))?;
    } else {
        print!("{text}");
    }
    Ok(())
}
