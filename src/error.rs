//! Error types for githelper
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.
//!
//! Cancellation is deliberately absent: a user backing out of a prompt or a picker is a
//! normal outcome (see [`crate::select::Selection`]), not an error.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for githelper
#[derive(Error, Debug)]
pub enum Error {
    /// The command cannot start (not in a repository, nothing to act on, ...)
    #[error("{0}")]
    Precondition(String),

    #[error("`{program}` is not installed or not in PATH; install it and try again")]
    ToolNotFound { program: String },

    #[error("`{command}` failed ({}){}", describe_code(.code), describe_stderr(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("invalid selection: '{0}'")]
    InvalidSelection(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn precondition(message: impl Into<String>) -> Self {
        Error::Precondition(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

/// Repository inspection errors
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Gitoxide error: {0}")]
    Gix(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Missing setting '{key}': {hint}")]
    Missing { key: String, hint: String },
}

/// GitHub REST API errors
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub token not found. Either:\n\
         1. Set GITHELPER_GITHUB_TOKEN environment variable\n\
         2. Add github_token to ~/.githelper.yaml\n\
         3. Use --config to specify a config file"
    )]
    TokenMissing,

    #[error("unauthorized: check your GitHub token")]
    Unauthorized,

    #[error("repository already exists or name is invalid")]
    RepoExists,

    #[error(
        "invalid GitHub URL '{0}'. Use HTTPS (https://github.com/user/repo) or SSH (git@github.com:user/repo)"
    )]
    InvalidUrl(String),

    #[error("invalid destination '{0}'. Use 'owner/repo'")]
    InvalidDestination(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },
}

/// Commit message generation errors
#[derive(Error, Debug)]
pub enum AiError {
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response contained no choices")]
    EmptyResponse,
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience conversions for gitoxide errors
impl From<gix::open::Error> for GitError {
    fn from(e: gix::open::Error) -> Self {
        GitError::Gix(e.to_string())
    }
}

impl From<gix::discover::Error> for GitError {
    fn from(e: gix::discover::Error) -> Self {
        GitError::Gix(e.to_string())
    }
}
