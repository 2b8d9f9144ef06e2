//! `remove` - print (or run) the full recipe for erasing a file from history

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use super::{filter_out_of_history, Context};
use crate::error::{Error, Result};
use crate::process::shell_escape;

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// File to remove from history
    pub file: String,

    /// Skip confirmation and run the rewrite immediately
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(ctx: &mut Context<'_>, args: RemoveArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let file = ctx.cwd.join(&args.file);
    if !file.exists() {
        return Err(Error::precondition(format!("file '{}' does not exist", args.file)));
    }
    let root = fs::canonicalize(git.toplevel()?)?;
    let relative = repo_relative(&root, &fs::canonicalize(&file)?)?;

    if !args.force {
        writeln!(
            ctx.console,
            "WARNING: This will permanently remove '{}' from git history.",
            relative
        )?;
        writeln!(ctx.console, "This operation cannot be undone and will rewrite git history.")?;
        writeln!(ctx.console, "\nIf you're sure you want to proceed, run:")?;
        writeln!(
            ctx.console,
            "git filter-branch --force --index-filter \"git rm --cached --ignore-unmatch {}\" --prune-empty --tag-name-filter cat -- --all",
            shell_escape(&relative)
        )?;
        writeln!(ctx.console, "\nAfter the operation completes, run:")?;
        writeln!(ctx.console, "rm -rf .git/refs/original/")?;
        writeln!(ctx.console, "git reflog expire --expire=now --all")?;
        writeln!(ctx.console, "git gc --prune=now --aggressive")?;
        writeln!(ctx.console, "\nFinally, force push your changes:")?;
        writeln!(ctx.console, "git push --force")?;
        writeln!(ctx.console, "\nOr rerun with --force to do all of this now.")?;
        return Ok(());
    }

    writeln!(ctx.console, "Removing '{}' from git history...", relative)?;
    filter_out_of_history(&git, &relative)?;

    let original_refs = ctx
        .cwd
        .join(git.output(["rev-parse", "--git-dir"])?.trim())
        .join("refs")
        .join("original");
    if original_refs.is_dir() {
        debug!(path = %original_refs.display(), "removing backup refs");
        fs::remove_dir_all(&original_refs)?;
    }

    writeln!(ctx.console, "Expiring reflog and collecting garbage...")?;
    git.run(["reflog", "expire", "--expire=now", "--all"])?;
    git.run(["gc", "--prune=now", "--aggressive"])?;

    writeln!(
        ctx.console,
        "\nFile removed from history. Force push to publish it:\n  git push --force"
    )?;
    Ok(())
}

/// `file` relative to the working tree root, with forward slashes
fn repo_relative(root: &Path, file: &Path) -> Result<String> {
    let relative: PathBuf = file
        .strip_prefix(root)
        .map_err(|_| {
            Error::precondition(format!(
                "'{}' is outside the repository at {}",
                file.display(),
                root.display()
            ))
        })?
        .to_path_buf();
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}
