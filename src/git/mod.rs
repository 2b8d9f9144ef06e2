//! Git access
//!
//! - `GitBackend` - read-only repository queries through gitoxide
//! - `Git` - the `git` executable, driven through a [`ProcessRunner`](crate::process::ProcessRunner)
//! - `parse` - one parser per text output shape

mod backend;
mod cli;
pub mod parse;

pub use backend::*;
pub use cli::*;
