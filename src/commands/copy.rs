//! `copy` - duplicate a GitHub repository, history included, under a new name

use std::io::Write;

use clap::Args;
use tracing::info;

use super::Context;
use crate::error::Result;
use crate::github::{parse_destination, parse_github_url, GitHubClient, RepoConfig, RepoPath};
use crate::process::CommandSpec;

#[derive(Debug, Args)]
pub struct CopyArgs {
    /// Source repository (HTTPS or SSH GitHub URL)
    pub source: String,

    /// Destination as `owner/repo`
    #[arg(short, long)]
    pub dest: String,

    /// The destination owner is an organization
    #[arg(short, long)]
    pub org: bool,

    /// Print the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Make the new repository public
    #[arg(long)]
    pub public: bool,

    /// Repository description
    #[arg(long)]
    pub description: Option<String>,

    /// Comma-separated topics
    #[arg(long, value_delimiter = ',')]
    pub topics: Vec<String>,

    /// Disable issues
    #[arg(long)]
    pub no_issues: bool,

    /// Disable the wiki
    #[arg(long)]
    pub no_wiki: bool,

    /// Push over HTTPS even when SSH is configured
    #[arg(long)]
    pub https: bool,
}

impl CopyArgs {
    fn repo_config(&self) -> RepoConfig {
        let defaults = RepoConfig::default();
        RepoConfig {
            private: !self.public,
            description: self
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(defaults.description),
            topics: self
                .topics
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            has_issues: !self.no_issues,
            has_wiki: !self.no_wiki,
        }
    }
}

pub fn run(ctx: &mut Context<'_>, args: CopyArgs) -> Result<()> {
    let source = parse_github_url(&args.source)?;
    let dest = parse_destination(&args.dest)?;
    let repo_config = args.repo_config();

    if args.dry_run {
        return print_plan(ctx, &args.source, &dest, &repo_config);
    }

    let token = ctx.config.github_token()?;
    writeln!(ctx.console, "Starting repository copy from {} to {}", source, dest)?;

    // Dropped on every return path, removing the mirror
    let work_dir = tempfile::Builder::new().prefix("githelper-copy-").tempdir()?;
    let mirror = work_dir.path().display().to_string();
    writeln!(ctx.console, "Working directory: {}", mirror)?;

    writeln!(ctx.console, "Cloning source repository...")?;
    ctx.git()
        .run(["clone", "--mirror", args.source.as_str(), mirror.as_str()])?;

    writeln!(ctx.console, "Creating destination repository...")?;
    GitHubClient::new(ctx.runner, token).create_repository(&dest, args.org, &repo_config)?;

    writeln!(ctx.console, "Pushing repository content...")?;
    let push_url = dest.push_url(ctx.config.use_ssh && !args.https);
    ctx.runner.checked(
        &CommandSpec::git(["push", "--mirror", push_url.as_str()])
            .current_dir(work_dir.path())
            .interactive(),
    )?;
    info!(%source, %dest, "repository copied");

    writeln!(ctx.console, "Successfully copied repository to {}", dest)?;
    Ok(())
}

fn print_plan(
    ctx: &mut Context<'_>,
    source: &str,
    dest: &RepoPath,
    config: &RepoConfig,
) -> Result<()> {
    let out = &mut *ctx.console;
    writeln!(out, "Dry run - no changes will be made")?;
    writeln!(out, "Would perform the following actions:\n")?;
    writeln!(out, "1. Create temporary directory for cloning")?;
    writeln!(out, "2. Clone {} with --mirror flag", source)?;
    writeln!(out, "3. Create new repository at {}", dest)?;
    writeln!(out, "   - Private: {}", config.private)?;
    writeln!(out, "   - Description: {}", config.description)?;
    if !config.topics.is_empty() {
        writeln!(out, "   - Topics: {}", config.topics.join(", "))?;
    }
    writeln!(out, "   - Issues enabled: {}", config.has_issues)?;
    writeln!(out, "   - Wiki enabled: {}", config.has_wiki)?;
    writeln!(out, "4. Push mirror to destination")?;
    writeln!(out, "5. Clean up temporary directory")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;
    use crate::error::{Error, GitHubError};
    use crate::process::ProcessOutcome;
    use crate::test_utils::RecordingRunner;
    use pretty_assertions::assert_eq;

    fn args(source: &str, dest: &str) -> CopyArgs {
        CopyArgs {
            source: source.to_string(),
            dest: dest.to_string(),
            org: false,
            dry_run: false,
            public: false,
            description: None,
            topics: Vec::new(),
            no_issues: false,
            no_wiki: false,
            https: false,
        }
    }

    #[test]
    fn test_repo_config_from_flags() {
        let mut a = args("https://github.com/a/b", "me/b");
        a.public = true;
        a.topics = vec!["rust".to_string(), " ".to_string(), " cli ".to_string()];
        a.no_wiki = true;

        let config = a.repo_config();
        assert_eq!(
            config,
            RepoConfig {
                private: false,
                description: "Repository copied using githelper".to_string(),
                topics: vec!["rust".to_string(), "cli".to_string()],
                has_issues: true,
                has_wiki: false,
            }
        );
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let runner = RecordingRunner::new();
        let mut h = Harness::new("");
        let mut a = args("git@github.com:rust-lang/cargo.git", "me/cargo-copy");
        a.dry_run = true;
        a.topics = vec!["rust".to_string(), "build".to_string()];
        run(&mut h.context(&runner), a).unwrap();

        let printed = h.printed();
        assert!(printed.contains("3. Create new repository at me/cargo-copy"));
        assert!(printed.contains("   - Topics: rust, build"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_invalid_source() {
        let runner = RecordingRunner::new();
        let mut h = Harness::new("");
        let err = run(&mut h.context(&runner), args("https://gitlab.com/a/b", "me/b")).unwrap_err();
        assert!(matches!(err, Error::GitHub(GitHubError::InvalidUrl(_))));
    }

    #[test]
    fn test_missing_token() {
        let runner = RecordingRunner::new();
        let mut h = Harness::new("");
        let err = run(&mut h.context(&runner), args("https://github.com/a/b", "me/b")).unwrap_err();
        assert!(matches!(err, Error::GitHub(GitHubError::TokenMissing)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_full_copy() {
        let runner = RecordingRunner::new().on("curl", ProcessOutcome::ok("{}\n201"));
        let mut h = Harness::new("");
        h.config.github_token = Some("ghp_test".to_string());
        let mut a = args("https://github.com/rust-lang/cargo", "me/cargo");
        a.https = true;
        run(&mut h.context(&runner), a).unwrap();

        let calls = runner.calls();
        let clone = calls.iter().position(|c| c.args.starts_with(&["clone".to_string()])).unwrap();
        let create = calls.iter().position(|c| c.program == "curl").unwrap();
        let push = calls
            .iter()
            .position(|c| c.args.first().map(String::as_str) == Some("push"))
            .unwrap();
        assert!(clone < create && create < push);

        let push = &calls[push];
        assert_eq!(push.args[2], "https://github.com/me/cargo.git");
        let mirror = push.cwd.clone().unwrap();
        assert_eq!(calls[clone].args[3], mirror.display().to_string());
        assert!(!mirror.exists());
    }

    #[test]
    fn test_existing_destination_skips_push() {
        let runner =
            RecordingRunner::new().on("curl", ProcessOutcome::ok("{\"message\":\"exists\"}\n422"));
        let mut h = Harness::new("");
        h.config.github_token = Some("ghp_test".to_string());
        let err = run(&mut h.context(&runner), args("https://github.com/a/b", "me/b")).unwrap_err();

        assert!(matches!(err, Error::GitHub(GitHubError::RepoExists)));
        assert!(!runner.ran("git push"));
    }
}
