//! `bitgugs config` -- show the effective configuration.

use anyhow::Result;

use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `bitgugs config` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    if ctx.json {
        output_json(&ctx.config)?;
    } else {
        print!("{}", ctx.config.to_yaml()?);
    }
    Ok(())
}
