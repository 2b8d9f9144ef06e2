//! External process execution
//!
//! Every git, fzf, bat, editor and curl invocation goes through here:
//! - `ProcessRunner` - The seam handlers are written against
//! - `SystemRunner` - Runs real executables with `std::process`
//! - `shell_escape` - Quoting for logged command lines

mod quote;
mod runner;

pub use quote::*;
pub use runner::*;
