//! Parsers for `git` text output
//!
//! One function per output shape. Each documents the exact command it expects;
//! lines that don't fit the shape are skipped, so malformed input yields an
//! empty (or shorter) result instead of an error.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};

use crate::error::{Error, Result};

/// `git branch --format` string matching [`parse_branches`]
pub const BRANCH_FORMAT: &str =
    "--format=%(HEAD)%09%(refname:short)%09%(committerdate:iso8601-strict)%09%(subject)";

/// `git reflog --format` string matching [`parse_reflog`]
pub const REFLOG_FORMAT: &str = "--format=%H%x09%gd%x09%gs";

/// `git cat-file --batch-check` format matching [`parse_blobs`]
pub const BLOB_CHECK_FORMAT: &str =
    "--batch-check=%(objecttype) %(objectname) %(objectsize) %(rest)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    pub committed: Option<DateTime<FixedOffset>>,
    pub subject: String,
}

/// Parse `git branch [-a] --format=<BRANCH_FORMAT>`.
///
/// Expected lines: `<* or space>\t<name>\t<iso8601 date>\t<subject>`.
/// Symbolic `*/HEAD` entries and the `(HEAD detached ...)` pseudo-branch are dropped.
pub fn parse_branches(output: &str) -> Vec<Branch> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(4, '\t');
            let marker = fields.next()?;
            let name = fields.next()?.trim();
            let date = fields.next()?;
            let subject = fields.next().unwrap_or("");

            if name.is_empty() || name.starts_with('(') || name.ends_with("/HEAD") {
                return None;
            }

            Some(Branch {
                name: name.to_string(),
                is_current: marker.trim() == "*",
                committed: DateTime::parse_from_rfc3339(date.trim()).ok(),
                subject: subject.trim().to_string(),
            })
        })
        .collect()
}

/// Parse `git branch --merged <base>`.
///
/// Expected lines: `  name`, `* name` (current) or `+ name` (checked out in
/// another worktree). Only plain entries are returned, since the marked ones
/// cannot be deleted.
pub fn parse_merged_branches(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.starts_with('*') && !line.starts_with('+'))
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}

/// Parse `git branch [--merged <base>]` keeping every entry, markers stripped.
pub fn parse_branch_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim_start_matches(['*', '+']).trim())
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflogEntry {
    pub hash: String,
    /// `HEAD@{n}`
    pub selector: String,
    pub subject: String,
}

impl ReflogEntry {
    pub fn short_hash(&self) -> &str {
        short(&self.hash)
    }
}

/// Parse `git reflog --format=<REFLOG_FORMAT>`: `<hash>\t<HEAD@{n}>\t<subject>`.
pub fn parse_reflog(output: &str) -> Vec<ReflogEntry> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(3, '\t');
            let hash = fields.next()?.trim();
            let selector = fields.next()?.trim();
            let subject = fields.next().unwrap_or("").trim();
            if !is_hex(hash) {
                return None;
            }
            Some(ReflogEntry {
                hash: hash.to_string(),
                selector: selector.to_string(),
                subject: subject.to_string(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Parse `git remote -v`: `<name>\t<url> (fetch|push)`.
///
/// Returns one entry per remote, using its fetch URL, in first-seen order.
pub fn parse_remotes(output: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in output.lines() {
        let Some((name, rest)) = line.split_once('\t') else {
            continue;
        };
        let Some(url) = rest.strip_suffix(" (fetch)") else {
            continue;
        };
        if remotes.iter().any(|r| r.name == name) {
            continue;
        }
        remotes.push(Remote {
            name: name.to_string(),
            url: url.trim().to_string(),
        });
    }
    remotes
}

/// Worktree information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeInfo {
    /// Path to the worktree
    pub path: PathBuf,
    /// Branch name, `None` when detached
    pub branch: Option<String>,
    /// HEAD commit ID
    pub head: String,
    /// Whether this is the main worktree
    pub is_main: bool,
}

impl WorktreeInfo {
    pub fn short_head(&self) -> &str {
        short(&self.head)
    }

    pub fn branch_label(&self) -> &str {
        self.branch.as_deref().unwrap_or("(detached)")
    }
}

/// Parse `git worktree list --porcelain`.
///
/// Records are `worktree <path>` followed by `HEAD <hash>` and `branch
/// refs/heads/<name>` or `detached`; the first record is the main worktree.
/// Bare entries carry no HEAD and are skipped.
pub fn parse_worktrees(output: &str) -> Vec<WorktreeInfo> {
    let mut worktrees = Vec::new();
    let mut current_path: Option<PathBuf> = None;
    let mut current_head: Option<String> = None;
    let mut current_branch: Option<String> = None;
    let mut first = true;

    let mut flush = |path: Option<PathBuf>, head: Option<String>, branch: Option<String>| {
        if let Some(path) = path {
            if let Some(head) = head {
                worktrees.push(WorktreeInfo {
                    path,
                    branch,
                    head,
                    is_main: first,
                });
            }
            first = false;
        }
    };

    for line in output.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            flush(current_path.take(), current_head.take(), current_branch.take());
            current_path = Some(PathBuf::from(path));
        } else if let Some(head) = line.strip_prefix("HEAD ") {
            current_head = Some(head.to_string());
        } else if let Some(branch) = line.strip_prefix("branch ") {
            let name = branch.strip_prefix("refs/heads/").unwrap_or(branch);
            current_branch = Some(name.to_string());
        }
    }
    flush(current_path, current_head, current_branch);

    worktrees
}

/// Parse `git diff --name-only --diff-filter=U`: one path per line, duplicates dropped.
pub fn parse_conflicted_files(output: &str) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for path in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !files.iter().any(|f| f == path) {
            files.push(path.to_string());
        }
    }
    files
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub subject: String,
}

/// Parse `git log --oneline`: `<abbrev hash> <subject>`.
pub fn parse_oneline(output: &str) -> Vec<Commit> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (hash, subject) = line.split_once(' ').unwrap_or((line, ""));
            if !is_hex(hash) {
                return None;
            }
            Some(Commit {
                hash: hash.to_string(),
                subject: subject.to_string(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeBlob {
    pub hash: String,
    pub size: u64,
    pub path: String,
}

/// Parse `git cat-file <BLOB_CHECK_FORMAT>` fed by `git rev-list --objects --all`.
///
/// Lines are `<type> <hash> <size> <path>`. Non-blobs, blobs without a path
/// and unparsable sizes are skipped. Paths may contain spaces.
pub fn parse_blobs(output: &str) -> Vec<LargeBlob> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(4, ' ');
            if fields.next()? != "blob" {
                return None;
            }
            let hash = fields.next()?;
            let size = fields.next()?.parse().ok()?;
            let path = fields.next()?.trim();
            if path.is_empty() {
                return None;
            }
            Some(LargeBlob {
                hash: hash.to_string(),
                size,
                path: path.to_string(),
            })
        })
        .collect()
}

/// Largest version of each path at or above `min_size`, biggest first, at most `top`
pub fn largest_blobs(blobs: Vec<LargeBlob>, min_size: u64, top: usize) -> Vec<LargeBlob> {
    let mut by_path: HashMap<String, LargeBlob> = HashMap::new();
    for blob in blobs.into_iter().filter(|b| b.size >= min_size) {
        match by_path.get(&blob.path) {
            Some(existing) if existing.size >= blob.size => {}
            _ => {
                by_path.insert(blob.path.clone(), blob);
            }
        }
    }

    let mut largest: Vec<LargeBlob> = by_path.into_values().collect();
    largest.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    largest.truncate(top);
    largest
}

/// Parse a size such as `500`, `500B`, `1.5MB` or `2 gb` into bytes (1024-based units)
pub fn parse_size(input: &str) -> Result<u64> {
    let normalized = input.trim().to_uppercase();
    let split = normalized
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(normalized.len());
    let (number, unit) = normalized.split_at(split);

    let multiplier: u64 = match unit.trim() {
        "" | "B" => 1,
        "KB" | "K" => 1024,
        "MB" | "M" => 1024 * 1024,
        "GB" | "G" => 1024 * 1024 * 1024,
        _ => return Err(invalid_size(input)),
    };

    let value: f64 = number.parse().map_err(|_| invalid_size(input))?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid_size(input));
    }
    Ok((value * multiplier as f64).round() as u64)
}

fn invalid_size(input: &str) -> Error {
    Error::invalid_input(format!(
        "invalid size '{}'; use a number with an optional B, KB, MB or GB suffix",
        input
    ))
}

/// Format bytes as `512 B`, `1.5 KB`, `3.2 MB` or `1.0 GB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn is_hex(s: &str) -> bool {
    s.len() >= 4 && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn short(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}
