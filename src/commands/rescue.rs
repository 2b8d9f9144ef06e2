//! `rescue` - turn a detached HEAD into a branch

use std::io::Write;

use clap::Args;

use super::Context;
use crate::error::{Error, Result};

/// Conventional prefixes dropped from the suggested name
const COMMIT_PREFIXES: [&str; 7] = [
    "feat:",
    "fix:",
    "chore:",
    "docs:",
    "style:",
    "refactor:",
    "test:",
];

const MAX_SLUG_LEN: usize = 30;

#[derive(Debug, Args)]
pub struct RescueArgs {
    /// Name of the new branch; suggested from the HEAD commit when omitted
    pub name: Option<String>,
}

pub fn run(ctx: &mut Context<'_>, args: RescueArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    if !ctx.backend()?.is_detached()? {
        return Err(Error::precondition(
            "not in detached HEAD state; this command is only needed when HEAD is detached",
        ));
    }

    writeln!(ctx.console, "Current HEAD position:")?;
    git.run(["log", "--oneline", "-n", "1"])?;
    writeln!(ctx.console, "\nRecent commits:")?;
    git.run(["log", "--oneline", "-n", "5"])?;

    let name = match args.name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => {
            // A failing log only costs us the suggestion
            let message = git
                .probe(["log", "-1", "--pretty=%B"])?
                .into_result()
                .map(|o| o.stdout)
                .unwrap_or_default();
            let suggestion = branch_slug(&message);
            writeln!(ctx.console, "\nSuggested branch name: {}", suggestion)?;
            let input = ctx
                .console
                .prompt("Enter branch name (or press Enter to use suggestion): ")?;
            if input.is_empty() { suggestion } else { input }
        }
    };

    writeln!(ctx.console, "\nCreating new branch '{}' from current position...", name)?;
    git.run(["checkout", "-b", name.as_str()])?;
    writeln!(ctx.console, "Successfully created branch '{}'!", name)?;
    Ok(())
}

/// Branch name derived from the first line of a commit message
fn branch_slug(message: &str) -> String {
    let mut line = message.trim().lines().next().unwrap_or("");
    for prefix in COMMIT_PREFIXES {
        line = line.strip_prefix(prefix).unwrap_or(line);
    }

    let mut slug: String = line
        .trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .take(MAX_SLUG_LEN)
        .collect();

    if slug.is_empty() || slug.starts_with(|c: char| c.is_ascii_digit()) {
        slug.insert_str(0, "branch-");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;
    use crate::process::ProcessOutcome;
    use crate::test_utils::{detach_head, init_repo, RecordingRunner};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_branch_slug() {
        assert_eq!(branch_slug("feat: Add login form\n\nbody"), "add-login-form");
        assert_eq!(branch_slug("Fix the (weird) bug!"), "fix-the-weird-bug");
        assert_eq!(branch_slug("2024 cleanup"), "branch-2024-cleanup");
        assert_eq!(branch_slug(""), "branch-");
        assert_eq!(
            branch_slug("refactor: split the configuration loader into layers"),
            "split-the-configuration-loader"
        );
    }

    #[test]
    fn test_requires_detached_head() {
        let repo = init_repo();
        let runner = RecordingRunner::new();
        let mut h = Harness::new("");
        let err =
            run(&mut h.context_in(&runner, repo.path()), RescueArgs { name: None }).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(!runner.ran("git checkout"));
    }

    #[test]
    fn test_suggestion_used_on_empty_input() {
        let repo = init_repo();
        detach_head(repo.path());
        let runner = RecordingRunner::new()
            .on("git log -1 '--pretty=%B'", ProcessOutcome::ok("fix: Null check in parser\n"));
        let mut h = Harness::new("\n");
        run(&mut h.context_in(&runner, repo.path()), RescueArgs { name: None }).unwrap();

        assert!(h.printed().contains("Suggested branch name: null-check-in-parser"));
        assert!(runner.ran("git checkout -b null-check-in-parser"));
    }

    #[test]
    fn test_explicit_name() {
        let repo = init_repo();
        detach_head(repo.path());
        let runner = RecordingRunner::new();
        let mut h = Harness::new("");
        run(
            &mut h.context_in(&runner, repo.path()),
            RescueArgs {
                name: Some("hotfix".to_string()),
            },
        )
        .unwrap();
        assert!(runner.ran("git checkout -b hotfix"));
        assert!(!runner.ran("git log -1"));
    }

    proptest! {
        #[test]
        fn prop_slug_is_a_safe_branch_name(message in "\\PC{0,80}") {
            let slug = branch_slug(&message);
            prop_assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(slug.len() <= MAX_SLUG_LEN + "branch-".len());
            prop_assert!(!slug.starts_with(|c: char| c.is_ascii_digit()));
        }
    }
}
