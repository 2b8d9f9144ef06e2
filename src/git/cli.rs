//! The `git` executable
//!
//! Every call carries the working directory explicitly, so a handler can be
//! pointed at any repository without touching the process-wide cwd.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::process::{CommandSpec, ProcessOutcome, ProcessRunner};

/// Thin wrapper over a [`ProcessRunner`] for `git` invocations in one directory
#[derive(Clone, Copy)]
pub struct Git<'a> {
    runner: &'a dyn ProcessRunner,
    dir: &'a Path,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, dir: &'a Path) -> Self {
        Self { runner, dir }
    }

    /// A capture-mode `git` command rooted in this directory
    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::git(args).current_dir(self.dir)
    }

    /// Run in capture mode without judging the exit status
    pub fn probe<I, S>(&self, args: I) -> Result<ProcessOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.run(&self.command(args))
    }

    /// Captured stdout of a command that must succeed
    pub fn output<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.runner.checked(&self.command(args))?.stdout)
    }

    /// Run attached to the terminal; a non-zero exit is an error
    pub fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runner.checked(&self.command(args).interactive())?;
        Ok(())
    }

    /// Run attached to the terminal and report success instead of failing
    pub fn run_status<I, S>(&self, args: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.runner.run(&self.command(args).interactive())?.success())
    }

    /// Fail unless the directory is inside a git working tree
    pub fn ensure_repo(&self) -> Result<()> {
        let outcome = self.probe(["rev-parse", "--is-inside-work-tree"])?;
        if !outcome.success() {
            debug!(stderr = %outcome.stderr.trim(), "not inside a work tree");
            return Err(Error::precondition(
                "not a git repository (or any of the parent directories)",
            ));
        }
        Ok(())
    }

    /// `git status --porcelain` output
    pub fn status_porcelain(&self) -> Result<String> {
        self.output(["status", "--porcelain"])
    }

    pub fn is_clean(&self) -> Result<bool> {
        Ok(self.status_porcelain()?.trim().is_empty())
    }

    /// Fail when there are uncommitted changes
    pub fn ensure_clean(&self, action: &str) -> Result<()> {
        if !self.is_clean()? {
            return Err(Error::precondition(format!(
                "you have uncommitted changes; commit or stash them before {}",
                action
            )));
        }
        Ok(())
    }

    /// Current branch name (`HEAD` when detached)
    pub fn current_branch(&self) -> Result<String> {
        Ok(self
            .output(["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string())
    }

    /// Absolute path of the working tree root
    pub fn toplevel(&self) -> Result<PathBuf> {
        Ok(PathBuf::from(
            self.output(["rev-parse", "--show-toplevel"])?.trim(),
        ))
    }

    /// Number of commits reachable from HEAD
    pub fn commit_count(&self) -> Result<usize> {
        let out = self.output(["rev-list", "--count", "HEAD"])?;
        out.trim()
            .parse()
            .map_err(|_| Error::invalid_input(format!("unexpected commit count '{}'", out.trim())))
    }

    pub fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.probe(["remote", "get-url", name])?.success())
    }
}
