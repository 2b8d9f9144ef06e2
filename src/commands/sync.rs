//! `sync` - rebase onto the remote, carrying local changes through a stash

use std::io::Write;

use chrono::Local;
use clap::Args;
use tracing::{info, warn};

use super::Context;
use crate::error::{Error, Result};

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Branch to pull (defaults to the current one)
    pub branch: Option<String>,

    /// Do not stash local changes
    #[arg(long)]
    pub no_stash: bool,

    /// Proceed with uncommitted changes when not stashing
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &mut Context<'_>, args: SyncArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let branch = args.branch.unwrap_or_else(|| "HEAD".to_string());
    let dirty = !git.is_clean()?;
    let stashed = dirty && !args.no_stash;

    if stashed {
        writeln!(ctx.console, "Stashing local changes...")?;
        let message = format!(
            "Automatic stash by githelper sync at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        git.run(["stash", "push", "--include-untracked", "-m", message.as_str()])?;
        info!(%message, "stashed local changes");
    } else if dirty {
        if !args.force {
            return Err(Error::precondition(
                "you have uncommitted changes; use --force to proceed anyway, or commit/stash your changes",
            ));
        }
        writeln!(ctx.console, "Proceeding with uncommitted changes (forced)")?;
    }

    if let Err(e) = pull_rebase(ctx, &branch) {
        if stashed {
            writeln!(ctx.console, "\nSync failed. Your original changes are safe in the stash.")?;
            writeln!(
                ctx.console,
                "Resolve the problem (e.g. finish with 'git rebase --continue'), then run 'git stash pop'."
            )?;
        }
        return Err(e);
    }

    if stashed {
        writeln!(ctx.console, "Restoring your local changes...")?;
        if !git.run_status(["stash", "pop"])? {
            warn!("stash pop failed after sync");
            writeln!(ctx.console, "Failed to restore stashed changes.")?;
            writeln!(
                ctx.console,
                "Your changes are still in the stash. Use 'git stash pop' to restore them."
            )?;
        }
    }

    writeln!(ctx.console, "Successfully synchronized with remote!")?;
    Ok(())
}

fn pull_rebase(ctx: &mut Context<'_>, branch: &str) -> Result<()> {
    let git = ctx.git();
    writeln!(ctx.console, "Fetching remote changes...")?;
    git.run(["fetch", "origin"])?;
    writeln!(ctx.console, "Pulling remote changes with rebase...")?;
    git.run(["pull", "--rebase", "origin", branch])
}
