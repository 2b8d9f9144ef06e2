//! Configuration module
//!
//! Handles:
//! - User configuration (`~/.githelper.yaml`)
//! - `GITHELPER_*` environment overrides
//! - Command-line overrides

mod settings;

pub use settings::*;
