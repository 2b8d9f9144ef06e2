//! Command handlers
//!
//! Every handler follows the same shape: check preconditions, gather
//! candidates, optionally select, confirm anything destructive, then run the
//! effecting commands. Handlers see the outside world only through
//! [`Context`], so they can be driven by a scripted runner and console.

use std::io::Write;
use std::path::Path;

use clap::Subcommand;
use tracing::debug;

use crate::ai::OpenAiClient;
use crate::config::Config;
use crate::console::Console;
use crate::error::Result;
use crate::git::parse::{parse_reflog, REFLOG_FORMAT};
use crate::git::{Git, GitBackend};
use crate::process::ProcessRunner;
use crate::select::{MultiSelection, SelectRequest, SelectableItem, Selection, Selector, Strategy};

pub mod bisect;
pub mod blame;
pub mod cherry_pick;
pub mod clean;
pub mod clone;
pub mod commit;
pub mod config;
pub mod copy;
pub mod prune;
pub mod prune_remotes;
pub mod purge;
pub mod recover;
pub mod refresh;
pub mod remove;
pub mod rescue;
pub mod resolve;
pub mod restore;
pub mod squash;
pub mod switch;
pub mod sync;
pub mod sync_fork;
pub mod undo;
pub mod version;
pub mod worktree;

/// Entries shown by the numbered list when a history is long
pub const LIST_LIMIT: usize = 20;

/// Everything a handler may touch
pub struct Context<'a> {
    pub config: &'a Config,
    pub runner: &'a dyn ProcessRunner,
    pub console: &'a mut Console,
    /// Directory the command acts on
    pub cwd: &'a Path,
}

impl<'a> Context<'a> {
    pub fn new(
        config: &'a Config,
        runner: &'a dyn ProcessRunner,
        console: &'a mut Console,
        cwd: &'a Path,
    ) -> Self {
        Self {
            config,
            runner,
            console,
            cwd,
        }
    }

    pub fn git(&self) -> Git<'a> {
        Git::new(self.runner, self.cwd)
    }

    pub fn selector(&self) -> Selector<'a> {
        Selector::new(self.runner, self.config.no_fzf)
    }

    /// gitoxide view of the repository containing `cwd`
    pub fn backend(&self) -> Result<GitBackend> {
        GitBackend::discover(self.cwd)
    }

    pub fn select_one(&mut self, request: &SelectRequest) -> Result<Selection> {
        self.selector().select_one(self.console, request)
    }

    pub fn select_many(&mut self, request: &SelectRequest) -> Result<MultiSelection> {
        self.selector().select_many(self.console, request)
    }

    /// Trim long histories to [`LIST_LIMIT`] entries when the numbered list will be used
    pub fn limit_for_list<T>(&self, items: &mut Vec<T>) {
        if self.selector().strategy() == Strategy::List {
            items.truncate(LIST_LIMIT);
        }
    }

    /// Integration branch: the configured one if it exists locally, else `main`, else `master`.
    /// Falls back to the configured name when the repository cannot be inspected.
    pub fn main_branch(&self) -> String {
        let preferred = &self.config.main_branch;
        match self.backend().and_then(|b| b.detect_main_branch(preferred)) {
            Ok(branch) => branch,
            Err(e) => {
                debug!(error = %e, "main branch detection failed");
                preferred.clone()
            }
        }
    }

    /// The standard confirmation; `false` unless the user typed yes
    pub fn confirm(&mut self) -> Result<bool> {
        self.console.confirm_continue()
    }

    /// Report a user cancellation. Always succeeds.
    pub fn cancelled(&mut self) -> Result<()> {
        writeln!(self.console, "Operation cancelled")?;
        Ok(())
    }

    /// Chat-completion client when an API key is configured
    pub fn message_generator(&self) -> Option<OpenAiClient<'a>> {
        self.config
            .openai_api_key()
            .map(|key| OpenAiClient::new(self.runner, key, self.config.openai_model.clone()))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively switch between branches
    Switch(switch::SwitchArgs),

    /// Delete local branches already merged into the main branch
    Prune(prune::PruneArgs),

    /// Remove remotes that can no longer be reached
    PruneRemotes(prune_remotes::PruneRemotesArgs),

    /// Squash the last N commits into one
    Squash(squash::SquashArgs),

    /// Cherry-pick selected commits from a pull request
    CherryPick(cherry_pick::CherryPickArgs),

    /// Start a bisect session from two selected commits
    Bisect,

    /// Find large files in history and remove one
    Clean(clean::CleanArgs),

    /// Remove a tracked file from the entire history
    Purge(purge::PurgeArgs),

    /// Show (or run) the steps to remove a file from history
    Remove(remove::RemoveArgs),

    /// Reset the current branch to a commit from the reflog
    Recover,

    /// Create a branch from a commit in the reflog
    Restore,

    /// Create a branch from a detached HEAD
    Rescue(rescue::RescueArgs),

    /// Resolve a conflicted file by taking one side
    Resolve(resolve::ResolveArgs),

    /// Discard local modifications and rebuild the index
    Refresh(refresh::RefreshArgs),

    /// Undo the last commits and force-push
    Undo(undo::UndoArgs),

    /// Fetch and rebase onto the remote, stashing local changes
    Sync(sync::SyncArgs),

    /// Rebase a fork onto its upstream
    SyncFork(sync_fork::SyncForkArgs),

    /// Manage worktrees
    #[command(subcommand)]
    Worktree(worktree::WorktreeCommand),

    /// Show the history of a single line
    Blame(blame::BlameArgs),

    /// Clone with size-reducing options
    Clone(clone::CloneArgs),

    /// Write a conventional commit message for staged changes
    Commit(commit::CommitArgs),

    /// Copy a GitHub repository with its full history
    Copy(copy::CopyArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),

    /// Print version information
    Version,
}

/// Run one command to completion
pub fn dispatch(ctx: &mut Context<'_>, command: Command) -> Result<()> {
    match command {
        Command::Switch(args) => switch::run(ctx, args),
        Command::Prune(args) => prune::run(ctx, args),
        Command::PruneRemotes(args) => prune_remotes::run(ctx, args),
        Command::Squash(args) => squash::run(ctx, args),
        Command::CherryPick(args) => cherry_pick::run(ctx, args),
        Command::Bisect => bisect::run(ctx),
        Command::Clean(args) => clean::run(ctx, args),
        Command::Purge(args) => purge::run(ctx, args),
        Command::Remove(args) => remove::run(ctx, args),
        Command::Recover => recover::run(ctx),
        Command::Restore => restore::run(ctx),
        Command::Rescue(args) => rescue::run(ctx, args),
        Command::Resolve(args) => resolve::run(ctx, args),
        Command::Refresh(args) => refresh::run(ctx, args),
        Command::Undo(args) => undo::run(ctx, args),
        Command::Sync(args) => sync::run(ctx, args),
        Command::SyncFork(args) => sync_fork::run(ctx, args),
        Command::Worktree(command) => worktree::run(ctx, command),
        Command::Blame(args) => blame::run(ctx, args),
        Command::Clone(args) => clone::run(ctx, args),
        Command::Commit(args) => commit::run(ctx, args),
        Command::Copy(args) => copy::run(ctx, args),
        Command::Config(args) => config::run(ctx, args),
        Command::Version => version::run(ctx),
    }
}

/// Pick a commit from the reflog; `None` when the user cancels
pub(crate) fn select_reflog_commit(ctx: &mut Context<'_>, heading: &str) -> Result<Option<String>> {
    let mut entries = parse_reflog(&ctx.git().output(["reflog", REFLOG_FORMAT])?);
    ctx.limit_for_list(&mut entries);

    let items = entries
        .iter()
        .map(|e| {
            let label = format!("{} {}: {}", e.short_hash(), e.selector, e.subject);
            SelectableItem::new(label, e.hash.clone())
        })
        .collect();
    let request = SelectRequest::new("commit", items)
        .heading(heading)
        .preview("git show --color=always {}");
    Ok(ctx.select_one(&request)?.into_option())
}

/// Rewrite every commit so that `path` never existed
pub(crate) fn filter_out_of_history(git: &Git<'_>, path: &str) -> Result<()> {
    git.run(filter_branch_args(path))
}

pub(crate) fn filter_branch_args(path: &str) -> Vec<String> {
    vec![
        "filter-branch".to_string(),
        "--force".to_string(),
        "--index-filter".to_string(),
        format!(
            "git rm --cached --ignore-unmatch {}",
            crate::process::shell_escape(path)
        ),
        "--prune-empty".to_string(),
        "--tag-name-filter".to_string(),
        "cat".to_string(),
        "--".to_string(),
        "--all".to_string(),
    ]
}
