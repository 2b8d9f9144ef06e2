//! `purge` - remove a tracked file from every commit

use std::io::Write;

use clap::Args;

use super::{filter_out_of_history, Context};
use crate::error::Result;
use crate::select::{SelectRequest, SelectableItem};

#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// File to purge; picked from the tracked files when omitted
    pub file: Option<String>,

    /// Force push all branches afterwards
    #[arg(long)]
    pub force_push: bool,
}

pub fn run(ctx: &mut Context<'_>, args: PurgeArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let path = match args.file {
        Some(file) => file,
        None => {
            let items = git
                .output(["ls-files"])?
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(SelectableItem::plain)
                .collect();
            let preview = if ctx.runner.is_installed("bat") {
                "bat --style=numbers --color=always {}"
            } else {
                "cat {}"
            };
            let request = SelectRequest::new("file", items)
                .heading("Tracked files:")
                .preview(preview);

            match ctx.select_one(&request)?.into_option() {
                Some(path) => path,
                None => return ctx.cancelled(),
            }
        }
    };

    writeln!(ctx.console, "\nWARNING: This will permanently remove '{}' from git history!", path)?;
    writeln!(ctx.console, "This action CANNOT be undone and will rewrite git history.")?;
    if !ctx.confirm()? {
        return ctx.cancelled();
    }

    writeln!(ctx.console, "\nRemoving '{}' from git history...", path)?;
    filter_out_of_history(&git, &path)?;

    if args.force_push {
        writeln!(ctx.console, "\nForce pushing changes...")?;
        git.run(["push", "origin", "--force", "--all"])?;
    } else {
        writeln!(
            ctx.console,
            "\nChanges are local only. To push them:\n  git push origin --force --all"
        )?;
    }

    writeln!(ctx.console, "File removed from git history!")?;
    Ok(())
}
