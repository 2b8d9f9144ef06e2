//! Git backend using gitoxide
//!
//! Read-only queries (HEAD state, branch existence, repository root).
//! Anything that mutates the repository goes through the `git` executable.

use std::path::Path;

use gix::Repository;
use tracing::{debug, instrument};

use crate::error::{GitError, Result};

/// State of HEAD
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// On a branch with at least one commit
    Branch(String),
    /// Detached at the given commit
    Detached(String),
    /// On a branch that has no commits yet
    Unborn(String),
}

/// Git backend using gitoxide
pub struct GitBackend {
    /// The gitoxide repository handle
    repo: Repository,
}

impl GitBackend {
    /// Discover repository from a path (searches parent directories)
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let repo = gix::discover(path).map_err(|_e| GitError::NotARepository(path.to_path_buf()))?;

        debug!(git_dir = %repo.path().display(), "discovered repository");
        Ok(Self { repo })
    }

    pub fn head(&self) -> Result<HeadState> {
        let head = self.repo.head().map_err(|e| GitError::Gix(e.to_string()))?;

        let state = match head.kind {
            gix::head::Kind::Symbolic(reference) => {
                HeadState::Branch(reference.name.shorten().to_string())
            }
            gix::head::Kind::Detached { target, .. } => HeadState::Detached(target.to_string()),
            gix::head::Kind::Unborn(full_name) => {
                HeadState::Unborn(full_name.shorten().to_string())
            }
        };
        Ok(state)
    }

    pub fn is_detached(&self) -> Result<bool> {
        Ok(matches!(self.head()?, HeadState::Detached(_)))
    }

    /// Check if a local branch exists
    pub fn branch_exists(&self, branch_name: &str) -> Result<bool> {
        let refs = self
            .repo
            .references()
            .map_err(|e| GitError::Gix(e.to_string()))?;

        let branch_ref = format!("refs/heads/{}", branch_name);

        for reference in refs.all().map_err(|e| GitError::Gix(e.to_string()))? {
            match reference {
                Ok(r) => {
                    if r.name().as_bstr() == branch_ref.as_bytes() {
                        return Ok(true);
                    }
                }
                Err(_) => continue,
            }
        }

        Ok(false)
    }

    /// Pick the integration branch: `preferred` if it exists, else main, else master
    pub fn detect_main_branch(&self, preferred: &str) -> Result<String> {
        for candidate in [preferred, "main", "master"] {
            if self.branch_exists(candidate)? {
                return Ok(candidate.to_string());
            }
        }
        Ok(preferred.to_string())
    }
}
