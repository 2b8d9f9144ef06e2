//! `clone` - clone with size-reducing options and report the result

use std::io::Write;
use std::path::Path;

use clap::Args;
use tracing::debug;
use walkdir::WalkDir;

use super::Context;
use crate::error::{Error, Result};
use crate::git::parse::format_size;
use crate::github::{default_directory, normalize_repo_url};

#[derive(Debug, Args)]
pub struct CloneArgs {
    /// Repository URL or `owner/repo`
    pub repo: String,

    /// Target directory (defaults to the repository name)
    pub dir: Option<String>,

    /// Create a shallow clone with this many commits
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub depth: Option<u32>,

    /// Clone only the default branch
    #[arg(long)]
    pub single_branch: bool,

    /// Skip tags
    #[arg(long)]
    pub no_tags: bool,
}

pub fn run(ctx: &mut Context<'_>, args: CloneArgs) -> Result<()> {
    let url = normalize_repo_url(&args.repo);
    let dir = match args.dir {
        Some(dir) => dir,
        None => default_directory(&url).ok_or_else(|| {
            Error::invalid_input(format!("cannot derive a directory name from {}", url))
        })?,
    };

    writeln!(ctx.console, "Cloning repository: {}", url)?;
    let mut clone_args = vec!["clone".to_string(), "--progress".to_string()];
    if let Some(depth) = args.depth {
        writeln!(ctx.console, "Shallow clone with depth: {}", depth)?;
        clone_args.push("--depth".to_string());
        clone_args.push(depth.to_string());
    }
    if args.single_branch {
        writeln!(ctx.console, "Cloning only the default branch")?;
        clone_args.push("--single-branch".to_string());
    }
    if args.no_tags {
        writeln!(ctx.console, "Skipping tag download")?;
        clone_args.push("--no-tags".to_string());
    }
    clone_args.push(url);
    clone_args.push(dir.clone());

    ctx.git().run(clone_args)?;

    let target = ctx.cwd.join(&dir);
    if let Some(size) = directory_size(&target) {
        writeln!(ctx.console, "Repository size: {}", format_size(size))?;
    }
    writeln!(ctx.console, "Repository cloned successfully to: {}", dir)?;
    Ok(())
}

/// Total size of the regular files under `root`; `None` when it does not exist
fn directory_size(root: &Path) -> Option<u64> {
    if !root.is_dir() {
        debug!(path = %root.display(), "clone target missing, skipping size");
        return None;
    }
    let total = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum();
    Some(total)
}
