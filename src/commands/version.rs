//! `version` - build information

use std::io::Write;

use super::Context;
use crate::error::Result;
use crate::{APP_NAME, VERSION};

/// Commit the binary was built from, stamped by the release build
pub const BUILD_COMMIT: &str = match option_env!("GITHELPER_COMMIT") {
    Some(commit) => commit,
    None => "none",
};

pub const BUILD_DATE: &str = match option_env!("GITHELPER_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

pub fn run(ctx: &mut Context<'_>) -> Result<()> {
    writeln!(ctx.console, "{} version {}", APP_NAME, VERSION)?;
    writeln!(ctx.console, "commit: {}", BUILD_COMMIT)?;
    writeln!(ctx.console, "built at: {}", BUILD_DATE)?;
    Ok(())
}
