//! `prune` - delete local branches merged into the main branch

use std::io::Write;

use clap::Args;
use tracing::warn;

use super::Context;
use crate::error::Result;
use crate::git::parse::parse_merged_branches;

#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Main branch name (defaults to the configured one)
    #[arg(long)]
    pub main: Option<String>,

    /// Delete without confirmation
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &mut Context<'_>, args: PruneArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;
    let main = args.main.unwrap_or_else(|| ctx.main_branch());

    writeln!(ctx.console, "Fetching and pruning remote branches...")?;
    git.run(["fetch", "-p"])?;

    // Current and worktree-checked-out branches are already excluded
    let merged = git.output(["branch", "--merged", main.as_str()])?;
    let branches: Vec<String> = parse_merged_branches(&merged)
        .into_iter()
        .filter(|b| *b != main)
        .collect();

    if branches.is_empty() {
        writeln!(ctx.console, "No merged branches to clean up")?;
        return Ok(());
    }

    writeln!(ctx.console, "\nMerged branches to delete:")?;
    for branch in &branches {
        writeln!(ctx.console, "- {}", branch)?;
    }

    if !args.force && !ctx.confirm()? {
        return ctx.cancelled();
    }

    let mut deleted = 0;
    for branch in &branches {
        writeln!(ctx.console, "Deleting branch '{}'...", branch)?;
        if git.run_status(["branch", "-d", branch.as_str()])? {
            deleted += 1;
        } else {
            warn!(%branch, "branch deletion failed");
            writeln!(ctx.console, "Failed to delete branch '{}'", branch)?;
        }
    }

    writeln!(ctx.console, "Deleted {} merged branch(es)", deleted)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;
    use crate::process::ProcessOutcome;
    use crate::test_utils::RecordingRunner;

    const MERGED: &str = "* current\n  old-one\n  main\n+ in-worktree\n  old-two\n";

    fn runner() -> RecordingRunner {
        RecordingRunner::new().on("git branch --merged main", ProcessOutcome::ok(MERGED))
    }

    #[test]
    fn test_prune_declined_deletes_nothing() {
        let runner = runner();
        let mut h = Harness::new("n\n");
        run(
            &mut h.context(&runner),
            PruneArgs {
                main: None,
                force: false,
            },
        )
        .unwrap();

        assert!(!runner.ran("git branch -d"));
        assert!(h.printed().contains("- old-one\n- old-two\n"));
        assert!(h.printed().contains("Operation cancelled"));
    }

    #[test]
    fn test_prune_force_continues_past_failures() {
        let runner =
            runner().on("git branch -d old-one", ProcessOutcome::failed(1, "not fully merged"));
        let mut h = Harness::new("");
        run(
            &mut h.context(&runner),
            PruneArgs {
                main: None,
                force: true,
            },
        )
        .unwrap();

        assert!(runner.ran("git branch -d old-one"));
        assert!(runner.ran("git branch -d old-two"));
        assert!(!runner.ran("git branch -d main"));
        assert!(!runner.ran("git branch -d current"));
        assert!(h.printed().contains("Deleted 1 merged branch(es)"));
    }

    #[test]
    fn test_prune_custom_main() {
        let runner =
            RecordingRunner::new().on("git branch --merged dev", ProcessOutcome::ok("  dev\n"));
        let mut h = Harness::new("");
        run(
            &mut h.context(&runner),
            PruneArgs {
                main: Some("dev".to_string()),
                force: false,
            },
        )
        .unwrap();
        assert!(h.printed().contains("No merged branches"));
    }

    #[test]
    fn test_prune_detects_master() {
        let repo = crate::test_utils::init_repo();
        crate::test_utils::add_branch_ref(repo.path(), "master");
        let runner = RecordingRunner::new().on(
            "git branch --merged master",
            ProcessOutcome::ok("  master\n  done\n"),
        );
        let mut h = Harness::new("y\n");
        run(
            &mut h.context_in(&runner, repo.path()),
            PruneArgs {
                main: None,
                force: false,
            },
        )
        .unwrap();

        assert!(runner.ran("git branch -d done"));
        assert!(!runner.ran("git branch -d master"));
    }
}
