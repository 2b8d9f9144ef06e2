//! githelper - multi-step git and GitHub workflows as single commands
//!
//! Each subcommand is a short, linear script over the `git` executable (and,
//! for a few, the GitHub REST API or a chat-completion API): check
//! preconditions, gather candidates, let the user pick one, confirm anything
//! destructive, then run the effecting commands.
//!
//! # Modules
//!
//! - [`commands`] - One handler per subcommand, plus the shared [`commands::Context`]
//! - [`process`] - External process execution behind the [`process::ProcessRunner`] trait
//! - [`select`] - fzf or numbered-list selection of branches, commits and files
//! - [`console`] - Prompts and confirmations over any reader/writer pair
//! - [`git`] - `git` CLI wrapper, output parsers and gitoxide queries
//! - [`github`] - GitHub URL handling and REST client
//! - [`ai`] - Commit message generation
//! - [`http`] - JSON-over-HTTPS through `curl`
//! - [`config`] - Layered configuration
//! - [`error`] - Error types

pub mod ai;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod git;
pub mod github;
pub mod http;
pub mod process;
pub mod select;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use error::{Error, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
