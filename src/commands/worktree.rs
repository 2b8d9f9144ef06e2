//! `worktree` - list, switch, create, remove, clean up and pull worktrees

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;
use tracing::{debug, warn};

use super::Context;
use crate::error::Result;
use crate::git::parse::{parse_branch_names, parse_worktrees, WorktreeInfo};
use crate::process::CommandSpec;
use crate::select::{SelectRequest, SelectableItem};

#[derive(Debug, Subcommand)]
pub enum WorktreeCommand {
    /// List worktrees with their branch and HEAD
    List,

    /// Open a shell in another worktree
    Switch {
        /// Print the selected path instead of starting a shell
        #[arg(long)]
        print: bool,
    },

    /// Create a worktree for a branch
    Create {
        /// Branch to check out (created from HEAD when missing)
        branch: String,

        /// Worktree directory (defaults to ../<branch>)
        #[arg(long)]
        path: Option<String>,
    },

    /// Remove a worktree
    Remove {
        /// Worktree directory
        path: String,

        /// Remove even with local modifications
        #[arg(long)]
        force: bool,
    },

    /// Remove worktrees whose branch is merged into the main branch
    Cleanup {
        /// Main branch name (defaults to the configured one)
        #[arg(long)]
        main: Option<String>,

        /// Remove without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Pull updates in a selected worktree
    Pull,
}

pub fn run(ctx: &mut Context<'_>, command: WorktreeCommand) -> Result<()> {
    ctx.git().ensure_repo()?;
    match command {
        WorktreeCommand::List => list(ctx),
        WorktreeCommand::Switch { print } => switch(ctx, print),
        WorktreeCommand::Create { branch, path } => create(ctx, &branch, path),
        WorktreeCommand::Remove { path, force } => remove(ctx, &path, force),
        WorktreeCommand::Cleanup { main, force } => cleanup(ctx, main, force),
        WorktreeCommand::Pull => pull(ctx),
    }
}

fn worktrees(ctx: &Context<'_>) -> Result<Vec<WorktreeInfo>> {
    Ok(parse_worktrees(
        &ctx.git().output(["worktree", "list", "--porcelain"])?,
    ))
}

fn list(ctx: &mut Context<'_>) -> Result<()> {
    for wt in worktrees(ctx)? {
        let marker = if wt.is_main { " (main)" } else { "" };
        writeln!(
            ctx.console,
            "{}  {}  {}{}",
            wt.path.display(),
            wt.branch_label(),
            wt.short_head(),
            marker
        )?;
    }
    Ok(())
}

/// Pick a worktree; `None` when the user cancels
fn select_worktree(ctx: &mut Context<'_>) -> Result<Option<PathBuf>> {
    let items = worktrees(ctx)?
        .iter()
        .map(|wt| {
            let path = wt.path.display().to_string();
            SelectableItem::new(format!("{} [{}]", path, wt.branch_label()), path)
        })
        .collect();
    let request = SelectRequest::new("worktree", items)
        .heading("Available worktrees:")
        .preview("git -C {} status");
    Ok(ctx.select_one(&request)?.into_option().map(PathBuf::from))
}

fn switch(ctx: &mut Context<'_>, print: bool) -> Result<()> {
    // Keep stdout clean for `cd "$(githelper worktree switch --print)"`
    if print {
        ctx.console.divert_to_stderr();
    }
    let Some(path) = select_worktree(ctx)? else {
        return ctx.cancelled();
    };

    if print {
        writeln!(ctx.console.data(), "{}", path.display())?;
        return Ok(());
    }

    // A child process cannot move its parent's shell, so open a new one there
    std::env::set_current_dir(&path)?;
    let shell = std::env::var("SHELL").unwrap_or_else(|_| "sh".to_string());
    writeln!(ctx.console, "Switching to worktree: {}", path.display())?;
    writeln!(ctx.console, "Starting {} there; exit it to return.", shell)?;
    ctx.runner
        .checked(&CommandSpec::new(shell).current_dir(&path).interactive())?;
    Ok(())
}

fn create(ctx: &mut Context<'_>, branch: &str, path: Option<String>) -> Result<()> {
    let path = path.unwrap_or_else(|| format!("../{}", branch));
    let exists = ctx.backend()?.branch_exists(branch)?;
    debug!(branch, exists, %path, "creating worktree");

    writeln!(ctx.console, "Creating worktree for branch '{}'...", branch)?;
    let git = ctx.git();
    if exists {
        git.run(["worktree", "add", path.as_str(), branch])?;
    } else {
        git.run(["worktree", "add", "-b", branch, path.as_str()])?;
    }

    writeln!(ctx.console, "Worktree created at: {}", path)?;
    Ok(())
}

fn remove(ctx: &mut Context<'_>, path: &str, force: bool) -> Result<()> {
    let mut args = vec!["worktree", "remove"];
    if force {
        args.push("--force");
    }
    args.push(path);

    writeln!(ctx.console, "Removing worktree: {}", path)?;
    ctx.git().run(args)?;
    writeln!(ctx.console, "Worktree removed: {}", path)?;
    Ok(())
}

fn cleanup(ctx: &mut Context<'_>, main: Option<String>, force: bool) -> Result<()> {
    let git = ctx.git();
    let main = main.unwrap_or_else(|| ctx.main_branch());
    let merged = parse_branch_names(&git.output(["branch", "--merged", main.as_str()])?);

    let stale: Vec<WorktreeInfo> = worktrees(ctx)?
        .into_iter()
        .filter(|wt| !wt.is_main)
        .filter(|wt| match &wt.branch {
            Some(branch) => *branch != main && merged.contains(branch),
            None => false,
        })
        .collect();

    if stale.is_empty() {
        writeln!(ctx.console, "No worktrees with merged branches")?;
        return Ok(());
    }

    writeln!(ctx.console, "\nWorktrees for branches merged into {}:", main)?;
    for wt in &stale {
        writeln!(ctx.console, "- {} [{}]", wt.path.display(), wt.branch_label())?;
    }
    if !force && !ctx.confirm()? {
        return ctx.cancelled();
    }

    let mut removed = 0;
    for wt in &stale {
        let path = wt.path.display().to_string();
        if git.run_status(["worktree", "remove", path.as_str()])? {
            removed += 1;
        } else {
            warn!(%path, "worktree removal failed");
            writeln!(ctx.console, "Failed to remove worktree {}", path)?;
        }
    }

    writeln!(ctx.console, "Cleanup complete! Removed {} worktree(s)", removed)?;
    Ok(())
}

fn pull(ctx: &mut Context<'_>) -> Result<()> {
    let Some(path) = select_worktree(ctx)? else {
        return ctx.cancelled();
    };

    writeln!(ctx.console, "Pulling updates in worktree: {}", path.display())?;
    ctx.runner
        .checked(&CommandSpec::git(["pull"]).current_dir(&path).interactive())?;
    writeln!(ctx.console, "Updates pulled successfully!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;
    use crate::process::ProcessOutcome;
    use crate::test_utils::{add_branch_ref, init_repo, RecordingRunner};
    use std::path::Path;

    const PORCELAIN: &str = "worktree /work/app\n\
                             HEAD 1111111111111111111111111111111111111111\n\
                             branch refs/heads/main\n\
                             \n\
                             worktree /work/app-done\n\
                             HEAD 2222222222222222222222222222222222222222\n\
                             branch refs/heads/done\n\
                             \n\
                             worktree /work/app-wip\n\
                             HEAD 3333333333333333333333333333333333333333\n\
                             branch refs/heads/wip\n\
                             \n\
                             worktree /work/app-detached\n\
                             HEAD 4444444444444444444444444444444444444444\n\
                             detached\n";

    fn runner() -> RecordingRunner {
        RecordingRunner::new()
            .on("git worktree list --porcelain", ProcessOutcome::ok(PORCELAIN))
            .on("git branch --merged main", ProcessOutcome::ok("* main\n+ done\n  old\n"))
    }

    #[test]
    fn test_list() {
        let runner = runner();
        let mut h = Harness::new("");
        run(&mut h.context(&runner), WorktreeCommand::List).unwrap();

        let printed = h.printed();
        assert!(printed.contains("/work/app  main  1111111 (main)\n"));
        assert!(printed.contains("/work/app-detached  (detached)  4444444\n"));
    }

    #[test]
    fn test_switch_print() {
        let runner = runner();
        let mut h = Harness::new("3\n");
        run(&mut h.context(&runner), WorktreeCommand::Switch { print: true }).unwrap();
        assert_eq!(h.printed(), "/work/app-wip\n");
        assert!(h.printed_errors().contains("Available worktrees:"));
        assert!(h.printed_errors().contains("Select worktree number"));
        assert!(!runner.calls().iter().any(|c| c.program != "git"));
    }

    #[test]
    fn test_switch_print_cancel_leaves_stdout_empty() {
        let runner = runner();
        let mut h = Harness::new("\n");
        run(&mut h.context(&runner), WorktreeCommand::Switch { print: true }).unwrap();
        assert_eq!(h.printed(), "");
        assert!(h.printed_errors().contains("Operation cancelled"));
    }

    #[test]
    fn test_pull_runs_in_selected_worktree() {
        let runner = runner();
        let mut h = Harness::new("2\n");
        run(&mut h.context(&runner), WorktreeCommand::Pull).unwrap();

        let pull = runner
            .calls()
            .into_iter()
            .find(|c| c.args == vec!["pull".to_string()])
            .unwrap();
        assert_eq!(pull.cwd.as_deref(), Some(Path::new("/work/app-done")));
    }

    #[test]
    fn test_cleanup_declined() {
        let runner = runner();
        let mut h = Harness::new("n\n");
        run(
            &mut h.context(&runner),
            WorktreeCommand::Cleanup {
                main: None,
                force: false,
            },
        )
        .unwrap();
        assert!(h.printed().contains("- /work/app-done [done]"));
        assert!(!runner.ran("git worktree remove"));
    }

    #[test]
    fn test_cleanup_removes_only_merged() {
        let runner = runner();
        let mut h = Harness::new("");
        run(
            &mut h.context(&runner),
            WorktreeCommand::Cleanup {
                main: None,
                force: true,
            },
        )
        .unwrap();

        assert!(runner.ran("git worktree remove /work/app-done"));
        assert!(!runner.ran("git worktree remove /work/app-wip"));
        assert_eq!(
            runner.commands().iter().filter(|c| c.starts_with("git worktree remove")).count(),
            1
        );
    }

    #[test]
    fn test_remove_with_force() {
        let runner = runner();
        let mut h = Harness::new("");
        run(
            &mut h.context(&runner),
            WorktreeCommand::Remove {
                path: "../old".to_string(),
                force: true,
            },
        )
        .unwrap();
        assert!(runner.ran("git worktree remove --force ../old"));
    }

    #[test]
    fn test_create_new_and_existing_branch() {
        let repo = init_repo();
        add_branch_ref(repo.path(), "existing");
        let runner = RecordingRunner::new();

        let mut h = Harness::new("");
        run(
            &mut h.context_in(&runner, repo.path()),
            WorktreeCommand::Create {
                branch: "fresh".to_string(),
                path: None,
            },
        )
        .unwrap();
        assert!(runner.ran("git worktree add -b fresh ../fresh"));

        run(
            &mut h.context_in(&runner, repo.path()),
            WorktreeCommand::Create {
                branch: "existing".to_string(),
                path: Some("/tmp/wt-existing".to_string()),
            },
        )
        .unwrap();
        assert!(runner.ran("git worktree add /tmp/wt-existing existing"));
    }
}
