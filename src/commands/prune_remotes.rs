//! `prune-remotes` - drop remotes that no longer answer

use std::io::Write;

use clap::Args;
use tracing::{debug, warn};

use super::Context;
use crate::error::Result;
use crate::git::parse::{parse_remotes, Remote};

#[derive(Debug, Args)]
pub struct PruneRemotesArgs {
    /// Only show which remotes would be removed
    #[arg(long, alias = "dry")]
    pub dry_run: bool,

    /// Remove without confirmation
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &mut Context<'_>, args: PruneRemotesArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let remotes = parse_remotes(&git.output(["remote", "-v"])?);
    if remotes.is_empty() {
        writeln!(ctx.console, "No remotes configured")?;
        return Ok(());
    }

    writeln!(ctx.console, "Checking remotes...")?;
    let mut unreachable: Vec<Remote> = Vec::new();
    for remote in remotes {
        let reachable = git
            .probe(["ls-remote", "--exit-code", remote.name.as_str()])?
            .success();
        debug!(remote = %remote.name, reachable, "probed remote");
        if !reachable {
            unreachable.push(remote);
        }
    }

    if unreachable.is_empty() {
        writeln!(ctx.console, "All remotes are reachable")?;
        return Ok(());
    }

    let heading = if args.dry_run {
        "\nThe following remotes would be removed:"
    } else {
        "\nThe following remotes will be removed:"
    };
    writeln!(ctx.console, "{}", heading)?;
    for remote in &unreachable {
        writeln!(ctx.console, "- {} ({})", remote.name, remote.url)?;
    }

    if args.dry_run {
        return Ok(());
    }
    if !args.force && !ctx.confirm()? {
        return ctx.cancelled();
    }

    let mut removed = 0;
    for remote in &unreachable {
        if git.run_status(["remote", "remove", remote.name.as_str()])? {
            removed += 1;
            writeln!(ctx.console, "Removed remote '{}'", remote.name)?;
        } else {
            warn!(remote = %remote.name, "remote removal failed");
            writeln!(ctx.console, "Failed to remove remote '{}'", remote.name)?;
        }
    }

    writeln!(ctx.console, "\nRemoved {} unreachable remote(s)", removed)?;
    Ok(())
}
