//! `clean` - find the largest blobs in history and rewrite one away

use std::io::Write;

use clap::Args;
use tracing::debug;

use super::{filter_out_of_history, Context};
use crate::error::Result;
use crate::git::parse::{format_size, largest_blobs, parse_blobs, parse_size, BLOB_CHECK_FORMAT};
use crate::select::{SelectRequest, SelectableItem};

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// File to remove; skips the search
    pub file: Option<String>,

    /// Number of largest files to show
    #[arg(short = 'n', long, default_value_t = 10)]
    pub top: usize,

    /// Minimum size to list (e.g. 500KB, 100MB)
    #[arg(short, long)]
    pub min: Option<String>,
}

pub fn run(ctx: &mut Context<'_>, args: CleanArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let path = match args.file {
        Some(file) => file,
        None => {
            let min_size = args.min.as_deref().map(parse_size).transpose()?.unwrap_or(0);
            writeln!(ctx.console, "Finding large files in git history...")?;

            let objects = git.output(["rev-list", "--objects", "--all"])?;
            let batch = ctx
                .runner
                .checked(&git.command(["cat-file", BLOB_CHECK_FORMAT]).stdin(objects))?;
            let blobs = largest_blobs(parse_blobs(&batch.stdout), min_size, args.top);
            debug!(count = blobs.len(), min_size, "largest blobs");

            if blobs.is_empty() {
                writeln!(ctx.console, "No files in history match the size threshold")?;
                return Ok(());
            }

            let items = blobs
                .iter()
                .map(|b| {
                    let label = format!("{} ({})", b.path, format_size(b.size));
                    SelectableItem::new(label, b.path.clone())
                })
                .collect();
            let request = SelectRequest::new("file", items)
                .heading("Largest files in repository history:")
                .preview("git log --oneline --all -- {}");

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

    writeln!(ctx.console, "\nRemoving '{}' from history...", path)?;
    filter_out_of_history(&git, &path)?;

    writeln!(ctx.console, "\nFile removed from git history!")?;
    writeln!(ctx.console, "To publish the rewritten history:\n  git push origin --force --all")?;
    Ok(())
}
