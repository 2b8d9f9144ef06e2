//! `blame` - follow the history of a single line

use std::io::Write;

use clap::Args;

use super::Context;
use crate::error::{Error, Result};

#[derive(Debug, Args)]
pub struct BlameArgs {
    /// File to inspect
    pub file: String,

    /// 1-based line number
    pub line: String,
}

pub fn run(ctx: &mut Context<'_>, args: BlameArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let line = parse_line(&args.line)?;
    if !ctx.cwd.join(&args.file).exists() {
        return Err(Error::precondition(format!("file not found: {}", args.file)));
    }

    writeln!(ctx.console, "History for {} line {}:\n", args.file, line)?;
    let range = format!("{},{}:{}", line, line, args.file);
    ctx.runner
        .checked(&git.command(["log", "-L", range.as_str()]).interactive())?;
    Ok(())
}

fn parse_line(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::invalid_input(format!("invalid line number: {}", raw))),
    }
}
