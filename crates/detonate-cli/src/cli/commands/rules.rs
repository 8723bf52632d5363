//! Rules command implementation.

use anyhow::Result;

use crate::output::{render_rules, OutputFormat};

use super::Context;

/// Print the effective rule table.
pub fn execute(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config.rules)?),
        OutputFormat::Pretty => print!("{}", render_rules(&config.rules)),
    }
    Ok(())
}
