//! `restore` - new branch at a reflog entry

use std::io::Write;

use super::{select_reflog_commit, Context};
use crate::error::{Error, Result};

pub fn run(ctx: &mut Context<'_>) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let Some(hash) = select_reflog_commit(ctx, "Recent reflog entries:")? else {
        return ctx.cancelled();
    };

    let name = ctx.console.prompt("Enter a name for the restored branch: ")?;
    if name.is_empty() {
        return ctx.cancelled();
    }
    if ctx.backend()?.branch_exists(&name)? {
        return Err(Error::precondition(format!("branch '{}' already exists", name)));
    }

    git.run(["checkout", "-b", name.as_str(), hash.as_str()])?;
    writeln!(ctx.console, "Restored commit {} to new branch '{}'", hash, name)?;
    Ok(())
}
