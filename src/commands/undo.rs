//! `undo` - roll back the last pushed commits

use std::io::Write;

use clap::Args;

use super::Context;
use crate::error::Result;

#[derive(Debug, Args)]
pub struct UndoArgs {
    /// Completely remove the changes instead of keeping them staged
    #[arg(long)]
    pub hard: bool,

    /// Number of commits to undo
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub num: u32,
}

pub fn run(ctx: &mut Context<'_>, args: UndoArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let effect = if args.hard {
        "and remove all changes"
    } else {
        "but keep changes locally"
    };
    writeln!(
        ctx.console,
        "Warning: This will undo the last {} commit(s) {}, then force push.",
        args.num, effect
    )?;
    if !ctx.confirm()? {
        return ctx.cancelled();
    }

    let mode = if args.hard { "--hard" } else { "--soft" };
    git.run(["reset".to_string(), mode.to_string(), format!("HEAD~{}", args.num)])?;
    git.run(["push", "origin", "HEAD", "--force-with-lease"])?;

    if args.hard {
        writeln!(
            ctx.console,
            "Successfully removed last {} commit(s) and pushed changes",
            args.num
        )?;
    } else {
        writeln!(
            ctx.console,
            "Successfully undid last {} commit(s) while keeping changes locally",
            args.num
        )?;
    }
    Ok(())
}
