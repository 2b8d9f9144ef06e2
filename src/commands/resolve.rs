//! `resolve` - settle a conflicted file by taking one side

use std::io::Write;

use clap::Args;
use tracing::warn;

use super::Context;
use crate::error::{Error, Result};
use crate::git::parse::parse_conflicted_files;
use crate::git::Git;
use crate::process::{shell_escape, CommandSpec, ProcessRunner};
use crate::select::{SelectRequest, SelectableItem};

const BAT_DIFF_ARGS: [&str; 3] = ["--style=numbers", "--color=always", "--language=diff"];

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Conflicted file; picked from the unmerged paths when omitted
    pub file: Option<String>,
}

/// Which side of the conflict to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Ours,
    Theirs,
}

impl Side {
    fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "o" | "ours" => Some(Side::Ours),
            "t" | "theirs" => Some(Side::Theirs),
            _ => None,
        }
    }

    fn checkout_flag(self) -> &'static str {
        match self {
            Side::Ours => "--ours",
            Side::Theirs => "--theirs",
        }
    }
}

pub fn run(ctx: &mut Context<'_>, args: ResolveArgs) -> Result<()> {
    ctx.git().ensure_repo()?;

    // Unmerged paths are reported relative to the top of the working tree
    let root = ctx.git().toplevel()?;
    let git = Git::new(ctx.runner, &root);

    let conflicted =
        parse_conflicted_files(&git.output(["diff", "--name-only", "--diff-filter=U"])?);
    if conflicted.is_empty() {
        return Err(Error::precondition("no merge conflicts found"));
    }

    let has_bat = ctx.runner.is_installed("bat");
    let file = match args.file {
        Some(file) => {
            if !conflicted.contains(&file) {
                return Err(Error::precondition(format!(
                    "specified file '{}' has no conflicts",
                    file
                )));
            }
            file
        }
        None => {
            let diff = format!("git -C {} diff {{}}", shell_escape(&root.display().to_string()));
            let preview = if has_bat {
                format!("{} | bat {}", diff, BAT_DIFF_ARGS.join(" "))
            } else {
                diff
            };
            let items = conflicted.iter().map(SelectableItem::plain).collect();
            let request = SelectRequest::new("file", items)
                .heading("Conflicted files:")
                .preview(preview)
                .preview_window("right:60%");

            match ctx.select_one(&request)?.into_option() {
                Some(file) => file,
                None => return ctx.cancelled(),
            }
        }
    };

    // The diff is informational; a failure to show it is not fatal
    if let Err(e) = show_diff(&git, ctx.runner, &file, has_bat) {
        warn!(error = %e, "could not show diff");
        writeln!(ctx.console, "Failed to show diff, continuing anyway...")?;
    }

    writeln!(ctx.console, "\nResolving conflicts in '{}'", file)?;
    writeln!(ctx.console, "Choose resolution:")?;
    writeln!(ctx.console, "  (o)urs   - Keep our version (current branch)")?;
    writeln!(ctx.console, "  (t)heirs - Keep their version (merging branch)")?;
    let choice = ctx.console.prompt("\nYour choice [o/t]: ")?;
    if choice.is_empty() {
        return ctx.cancelled();
    }
    let side = Side::parse(&choice)
        .ok_or_else(|| Error::invalid_input(format!("invalid choice: {}", choice)))?;

    git.run(["checkout", side.checkout_flag(), file.as_str()])?;
    git.run(["add", file.as_str()])?;

    writeln!(ctx.console, "Conflict in '{}' resolved!", file)?;
    Ok(())
}

fn show_diff(git: &Git<'_>, runner: &dyn ProcessRunner, file: &str, has_bat: bool) -> Result<()> {
    if has_bat {
        let diff = git.output(["diff", file])?;
        runner
            .checked(&CommandSpec::new("bat").args(BAT_DIFF_ARGS).interactive().stdin(diff))?;
    } else {
        git.run(["diff", file])?;
    }
    Ok(())
}
