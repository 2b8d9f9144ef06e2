//! `recover` - hard-reset the current branch to a reflog entry

use std::io::Write;

use super::{select_reflog_commit, Context};
use crate::error::Result;

pub fn run(ctx: &mut Context<'_>) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;
    git.ensure_clean("recovering a commit")?;

    let Some(hash) = select_reflog_commit(ctx, "Recent reflog entries:")? else {
        return ctx.cancelled();
    };

    writeln!(ctx.console, "\nThis will reset the current branch to {}.", hash)?;
    writeln!(ctx.console, "Commits after it will only be reachable through the reflog.")?;
    if !ctx.confirm()? {
        return ctx.cancelled();
    }

    git.run(["reset", "--hard", hash.as_str()])?;
    writeln!(ctx.console, "Successfully recovered to commit {}", hash)?;
    Ok(())
}
