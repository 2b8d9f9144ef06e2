//! Integration tests for githelper
//!
//! These tests drive handlers against real `git` repositories in temporary
//! directories. They are skipped when `git` is not installed.

use std::path::Path;
use std::process::Command as StdCommand;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use githelper::commands::{self, Command, Context};
use githelper::commands::{commit::CommitArgs, rescue::RescueArgs, squash::SquashArgs};
use githelper::commands::{switch::SortOrder, switch::SwitchArgs, undo::UndoArgs};
use githelper::config::Config;
use githelper::console::Console;
use githelper::git::parse::{
    parse_branches, parse_oneline, parse_reflog, BRANCH_FORMAT, REFLOG_FORMAT,
};
use githelper::process::{CommandSpec, ProcessRunner, SystemRunner};
use githelper::Error;

/// Helper to check if git is available
fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Run git in `dir` and return trimmed stdout, panicking on failure
fn git(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn commit_file(dir: &Path, name: &str, message: &str) {
    std::fs::write(dir.join(name), format!("{}\n", message)).unwrap();
    git(dir, &["add", name]);
    git(dir, &["commit", "-m", message]);
}

/// Helper to create a test repository on `main` with one commit
fn create_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let repo = temp_dir.path();

    git(repo, &["init"]);
    git(repo, &["config", "user.email", "test@test.com"]);
    git(repo, &["config", "user.name", "Test User"]);
    git(repo, &["config", "commit.gpgsign", "false"]);
    commit_file(repo, "README.md", "Initial commit");
    git(repo, &["branch", "-M", "main"]);

    temp_dir
}

/// Run one command in `dir` with scripted answers; returns the result and everything printed
fn run_in(dir: &Path, input: &str, command: Command) -> (githelper::Result<()>, String) {
    let config = Config {
        no_fzf: true,
        ..Config::default()
    };
    let runner = SystemRunner::new();
    let (mut console, output) = Console::scripted(input);
    let mut ctx = Context::new(&config, &runner, &mut console, dir);
    let result = commands::dispatch(&mut ctx, command);
    (result, output.contents())
}

#[test]
fn test_not_a_repository() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let dir = TempDir::new().unwrap();
    let (result, _) = run_in(dir.path(), "y\n", Command::Undo(UndoArgs { hard: false, num: 1 }));
    assert!(matches!(result, Err(Error::Precondition(_))));
}

#[test]
fn test_declined_undo_keeps_head() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let repo = create_test_repo();
    commit_file(repo.path(), "a.txt", "second");
    let before = git(repo.path(), &["rev-parse", "HEAD"]);

    let (result, printed) = run_in(
        repo.path(),
        "n\n",
        Command::Undo(UndoArgs { hard: true, num: 1 }),
    );
    result.unwrap();
    assert!(printed.contains("Operation cancelled"));
    assert_eq!(git(repo.path(), &["rev-parse", "HEAD"]), before);
}

#[test]
fn test_switch_from_numbered_list() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let repo = create_test_repo();
    git(repo.path(), &["branch", "alpha"]);

    let (result, printed) = run_in(
        repo.path(),
        "1\n",
        Command::Switch(SwitchArgs {
            all: false,
            sort: SortOrder::Name,
        }),
    );
    result.unwrap();
    assert!(printed.contains("1: alpha ("));
    assert_eq!(git(repo.path(), &["rev-parse", "--abbrev-ref", "HEAD"]), "alpha");
}

#[test]
fn test_squash_needs_enough_history() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let repo = create_test_repo();
    commit_file(repo.path(), "a.txt", "second");

    let (result, _) = run_in(
        repo.path(),
        "y\n",
        Command::Squash(SquashArgs {
            count: "2".to_string(),
            message: None,
            ai: false,
        }),
    );
    assert!(matches!(result, Err(Error::Precondition(_))));
    assert_eq!(git(repo.path(), &["rev-list", "--count", "HEAD"]), "2");
}

#[test]
fn test_squash_with_message() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let repo = create_test_repo();
    commit_file(repo.path(), "a.txt", "second");
    commit_file(repo.path(), "b.txt", "third");

    let (result, _) = run_in(
        repo.path(),
        "y\n",
        Command::Squash(SquashArgs {
            count: "2".to_string(),
            message: Some("feat: a and b".to_string()),
            ai: false,
        }),
    );
    result.unwrap();
    assert_eq!(git(repo.path(), &["rev-list", "--count", "HEAD"]), "2");
    assert_eq!(git(repo.path(), &["log", "-1", "--format=%s"]), "feat: a and b");
}

#[test]
fn test_restore_branch_from_reflog() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let repo = create_test_repo();
    commit_file(repo.path(), "a.txt", "second");
    let head = git(repo.path(), &["rev-parse", "HEAD"]);

    let (result, printed) = run_in(repo.path(), "1\nrestored\n", Command::Restore);
    result.unwrap();
    assert!(printed.contains("1: "));
    assert_eq!(git(repo.path(), &["rev-parse", "restored"]), head);
}

#[test]
fn test_rescue_detached_head() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let repo = create_test_repo();
    commit_file(repo.path(), "a.txt", "second");
    git(repo.path(), &["checkout", "--detach", "HEAD~1"]);

    let (result, _) = run_in(
        repo.path(),
        "",
        Command::Rescue(RescueArgs {
            name: Some("saved".to_string()),
        }),
    );
    result.unwrap();
    assert_eq!(git(repo.path(), &["rev-parse", "--abbrev-ref", "HEAD"]), "saved");

    // Attached now, so a second rescue is refused
    let (result, _) = run_in(repo.path(), "", Command::Rescue(RescueArgs { name: None }));
    assert!(matches!(result, Err(Error::Precondition(_))));
}

#[test]
fn test_commit_without_editor() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let repo = create_test_repo();
    std::fs::write(repo.path().join("new.txt"), "content\n").unwrap();

    let args = || CommitArgs {
        no_edit: true,
        commit_type: Some("feat".to_string()),
        ai: false,
    };
    let (result, _) = run_in(repo.path(), "", Command::Commit(args()));
    assert!(matches!(result, Err(Error::Precondition(_))));

    git(repo.path(), &["add", "new.txt"]);
    let (result, _) = run_in(repo.path(), "", Command::Commit(args()));
    result.unwrap();
    assert_eq!(git(repo.path(), &["log", "-1", "--format=%s"]), "feat:");
}

#[test]
fn test_parsers_on_real_output() {
    if !git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let repo = create_test_repo();
    commit_file(repo.path(), "a.txt", "second");
    git(repo.path(), &["branch", "topic"]);

    let branches = parse_branches(&git(repo.path(), &["branch", BRANCH_FORMAT]));
    let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["main", "topic"]);
    assert!(branches[0].is_current);
    assert!(branches.iter().all(|b| b.committed.is_some()));
    assert_eq!(branches[1].subject, "second");

    let reflog = parse_reflog(&git(repo.path(), &["reflog", REFLOG_FORMAT]));
    assert!(!reflog.is_empty());
    assert_eq!(reflog[0].selector, "HEAD@{0}");
    assert_eq!(reflog[0].hash, git(repo.path(), &["rev-parse", "HEAD"]));

    let commits = parse_oneline(&git(repo.path(), &["log", "--oneline"]));
    let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["second", "Initial commit"]);
}

#[test]
fn test_missing_tool() {
    let err = SystemRunner::new()
        .run(&CommandSpec::new("definitely-not-a-binary"))
        .unwrap_err();
    assert!(matches!(err, Error::ToolNotFound { .. }));
}
