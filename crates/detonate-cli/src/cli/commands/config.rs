//! Config command implementation.

use anyhow::Result;

use super::Context;

/// Print the effective configuration as TOML.
pub fn execute(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;
    print!("{}", config.to_toml()?);
    Ok(())
}
