//! `refresh` - discard local modifications and rebuild the index

use std::io::Write;

use clap::Args;

use super::Context;
use crate::error::Result;

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Files to refresh (everything when omitted)
    pub files: Vec<String>,

    /// Fix line ending issues (disables core.autocrlf and renormalizes)
    #[arg(long)]
    pub crlf: bool,

    /// Also remove untracked files and directories
    #[arg(long)]
    pub clean: bool,
}

pub fn run(ctx: &mut Context<'_>, args: RefreshArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    if !git.is_clean()? {
        writeln!(ctx.console, "WARNING: Local modifications will be discarded!")?;
        if args.clean {
            writeln!(ctx.console, "Untracked files and directories will be removed as well.")?;
        }
        if !ctx.confirm()? {
            return ctx.cancelled();
        }
    }

    if args.crlf {
        writeln!(ctx.console, "Fixing line endings...")?;
        git.run(["config", "core.autocrlf", "false"])?;
        git.run(["add", "--renormalize", "."])?;
    }

    writeln!(ctx.console, "Refreshing Git index...")?;
    let mut checkout = vec!["checkout".to_string(), "--".to_string()];
    if args.files.is_empty() {
        checkout.push(".".to_string());
    } else {
        checkout.extend(args.files);
    }
    git.run(checkout)?;

    if args.clean {
        writeln!(ctx.console, "Removing untracked files...")?;
        git.run(["clean", "-fd"])?;
    }

    git.run(["reset", "--hard", "HEAD"])?;
    writeln!(ctx.console, "Git index refreshed successfully!")?;
    Ok(())
}
