//! `config` - show the effective settings, or write a starter file

use std::io::Write;

use clap::Args;

use super::Context;
use crate::config::Config;
use crate::error::Result;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write a commented template to the config path
    #[arg(long)]
    pub init: bool,
}

pub fn run(ctx: &mut Context<'_>, args: ConfigArgs) -> Result<()> {
    let path = Config::config_file_path()?;

    if args.init {
        Config::write_template(&path)?;
        writeln!(ctx.console, "Wrote configuration template to {}", path.display())?;
        return Ok(());
    }

    let state = if path.is_file() { "" } else { " (not found)" };
    writeln!(ctx.console, "Config file: {}{}", path.display(), state)?;
    writeln!(ctx.console)?;
    print_settings(ctx)
}

fn print_settings(ctx: &mut Context<'_>) -> Result<()> {
    let summary = ctx.config.summary();
    let width = summary.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in summary {
        writeln!(ctx.console, "{:<width$}  {}", key, value, width = width)?;
    }
    Ok(())
}
