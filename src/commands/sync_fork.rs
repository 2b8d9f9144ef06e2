//! `sync-fork` - rebase a fork onto its upstream and push

use std::io::Write;

use clap::Args;

use super::Context;
use crate::error::{Error, Result};
use crate::github::{detect_upstream_url, normalize_repo_url};

const UPSTREAM: &str = "upstream";

#[derive(Debug, Args)]
pub struct SyncForkArgs {
    /// Upstream repository URL or `owner/repo`
    #[arg(long)]
    pub upstream: Option<String>,

    /// Upstream branch to rebase onto (defaults to the configured main branch)
    #[arg(long)]
    pub branch: Option<String>,
}

pub fn run(ctx: &mut Context<'_>, args: SyncForkArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;
    git.ensure_clean("syncing the fork")?;

    let branch = args.branch.unwrap_or_else(|| ctx.config.main_branch.clone());

    if !git.has_remote(UPSTREAM)? {
        let url = match args.upstream {
            Some(upstream) => normalize_repo_url(&upstream),
            None => {
                let origin = git.output(["remote", "get-url", "origin"]).map_err(|_| {
                    Error::precondition(
                        "upstream not configured and no origin remote to derive it from",
                    )
                })?;
                detect_upstream_url(origin.trim()).ok_or_else(|| {
                    Error::precondition(
                        "could not detect upstream repository; specify it with --upstream",
                    )
                })?
            }
        };
        writeln!(ctx.console, "Adding upstream remote: {}", url)?;
        git.run(["remote", "add", UPSTREAM, url.as_str()])?;
    }

    writeln!(ctx.console, "Fetching upstream changes...")?;
    git.run(["fetch", UPSTREAM])?;

    let current = git.current_branch()?;
    let target = format!("{}/{}", UPSTREAM, branch);
    writeln!(ctx.console, "Rebasing on {}...", target)?;
    if let Err(e) = git.run(["rebase", target.as_str()]) {
        writeln!(ctx.console, "\nRebase failed. Resolve the conflicts and run:")?;
        writeln!(ctx.console, "  git rebase --continue")?;
        writeln!(ctx.console, "Then run this command again.")?;
        return Err(e);
    }

    writeln!(ctx.console, "Pushing to origin/{}...", current)?;
    git.run(["push", "origin", current.as_str(), "--force-with-lease"])?;

    writeln!(ctx.console, "Successfully synced fork with {}!", target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;
    use crate::process::ProcessOutcome;
    use crate::test_utils::RecordingRunner;

    fn no_upstream() -> RecordingRunner {
        RecordingRunner::new()
            .on(
                "git remote get-url upstream",
                ProcessOutcome::failed(2, "error: No such remote 'upstream'"),
            )
            .on("git rev-parse --abbrev-ref HEAD", ProcessOutcome::ok("feature\n"))
    }

    fn args(upstream: Option<&str>, branch: Option<&str>) -> SyncForkArgs {
        SyncForkArgs {
            upstream: upstream.map(str::to_string),
            branch: branch.map(str::to_string),
        }
    }

    #[test]
    fn test_upstream_from_flag() {
        let runner = no_upstream();
        let mut h = Harness::new("");
        run(&mut h.context(&runner), args(Some("rust-lang/cargo"), Some("master"))).unwrap();

        assert!(runner.ran("git remote add upstream 'https://github.com/rust-lang/cargo.git'"));
        assert!(runner.ran("git fetch upstream"));
        assert!(runner.ran("git rebase upstream/master"));
        assert!(runner.ran("git push origin feature --force-with-lease"));
    }

    #[test]
    fn test_upstream_derived_from_origin() {
        let runner = no_upstream().on(
            "git remote get-url origin",
            ProcessOutcome::ok("git@github.com:me/project.git\n"),
        );
        let mut h = Harness::new("");
        run(&mut h.context(&runner), args(None, None)).unwrap();

        assert!(runner.ran("git remote add upstream 'https://github.com/me/project.git'"));
        assert!(runner.ran("git rebase upstream/main"));
    }

    #[test]
    fn test_undetectable_upstream() {
        let runner =
            no_upstream().on("git remote get-url origin", ProcessOutcome::ok("/srv/git/project\n"));
        let mut h = Harness::new("");
        let err = run(&mut h.context(&runner), args(None, None)).unwrap_err();
        assert!(err.to_string().contains("--upstream"));
        assert!(!runner.ran("git fetch"));
    }

    #[test]
    fn test_existing_upstream_is_reused() {
        let runner = RecordingRunner::new()
            .on("git rev-parse --abbrev-ref HEAD", ProcessOutcome::ok("main\n"));
        let mut h = Harness::new("");
        run(&mut h.context(&runner), args(None, None)).unwrap();
        assert!(!runner.ran("git remote add"));
        assert!(runner.ran("git fetch upstream"));
    }

    #[test]
    fn test_rebase_failure_skips_push() {
        let runner = RecordingRunner::new()
            .on("git rev-parse --abbrev-ref HEAD", ProcessOutcome::ok("main\n"))
            .on("git rebase", ProcessOutcome::failed(1, "CONFLICT"));
        let mut h = Harness::new("");
        assert!(run(&mut h.context(&runner), args(None, None)).is_err());
        assert!(h.printed().contains("git rebase --continue"));
        assert!(!runner.ran("git push"));
    }
}
