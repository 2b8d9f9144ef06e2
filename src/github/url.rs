//! GitHub repository URLs

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{GitHubError, Result};

static GITHUB_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https://github\.com/|git@github\.com:)([^/\s]+)/([^/\s]+?)(?:\.git)?/?$")
        .unwrap()
});

static SHORTHAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap());

/// `owner/name` of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPath {
    pub owner: String,
    pub name: String,
}

impl RepoPath {
    pub fn ssh_url(&self) -> String {
        format!("git@github.com:{}.git", self)
    }

    pub fn https_url(&self) -> String {
        format!("https://github.com/{}.git", self)
    }

    /// Push URL for the configured transport
    pub fn push_url(&self, use_ssh: bool) -> String {
        if use_ssh {
            self.ssh_url()
        } else {
            self.https_url()
        }
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse `https://github.com/owner/repo[.git]` or `git@github.com:owner/repo[.git]`
pub fn parse_github_url(url: &str) -> Result<RepoPath> {
    let caps = GITHUB_URL
        .captures(url.trim())
        .ok_or_else(|| GitHubError::InvalidUrl(url.to_string()))?;
    Ok(RepoPath {
        owner: caps[1].to_string(),
        name: caps[2].to_string(),
    })
}

/// Parse an `owner/repo` destination
pub fn parse_destination(dest: &str) -> Result<RepoPath> {
    let dest = dest.trim();
    if !SHORTHAND.is_match(dest) {
        return Err(GitHubError::InvalidDestination(dest.to_string()).into());
    }
    let (owner, name) = dest
        .split_once('/')
        .ok_or_else(|| GitHubError::InvalidDestination(dest.to_string()))?;
    Ok(RepoPath {
        owner: owner.to_string(),
        name: name.trim_end_matches(".git").to_string(),
    })
}

/// Expand `owner/repo` shorthand to an HTTPS clone URL; anything else is returned unchanged
pub fn normalize_repo_url(input: &str) -> String {
    let input = input.trim();
    if SHORTHAND.is_match(input) && !input.starts_with('.') {
        format!("https://github.com/{}.git", input.trim_end_matches(".git"))
    } else {
        input.to_string()
    }
}

/// Directory `git clone` would create for `url`: last path segment without `.git`
pub fn default_directory(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}

/// Guess the upstream of a fork from its `origin` URL.
///
/// SSH origins map to the HTTPS URL of the same path. HTTPS origins drop the
/// fork owner segment. Returns `None` for anything unrecognised.
pub fn detect_upstream_url(origin: &str) -> Option<String> {
    let origin = origin.trim();

    if origin.starts_with("git@") {
        let (_, path) = origin.split_once(':')?;
        if path.contains(':') {
            return None;
        }
        let path = path.trim_end_matches(".git");
        if path.matches('/').count() != 1 {
            return None;
        }
        return Some(format!("https://github.com/{}.git", path));
    }

    if origin.starts_with("https://") {
        let mut parts: Vec<&str> = origin.split('/').collect();
        if parts.len() < 5 {
            return None;
        }
        parts.remove(parts.len() - 2);
        return Some(parts.join("/"));
    }

    None
}
