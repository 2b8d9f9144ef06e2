//! `squash` - fold the last N commits into one

use std::io::Write;

use clap::Args;
use tracing::{debug, warn};

use super::Context;
use crate::ai::MessageGenerator;
use crate::error::{Error, Result};

/// Subjects quoted in the default message
const SUMMARY_SUBJECTS: usize = 3;

#[derive(Debug, Args)]
pub struct SquashArgs {
    /// Number of commits to squash (at least 2)
    pub count: String,

    /// Message for the squashed commit
    #[arg(short, long)]
    pub message: Option<String>,

    /// Generate the message from the squashed commits
    #[arg(long)]
    pub ai: bool,
}

pub fn run(ctx: &mut Context<'_>, args: SquashArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let count = parse_count(&args.count)?;
    let available = git.commit_count()?;
    if available <= count {
        return Err(Error::precondition(format!(
            "cannot squash {} commits: the branch only has {}",
            count, available
        )));
    }
    let count_arg = count.to_string();

    writeln!(ctx.console, "Last {} commits to be squashed:\n", count)?;
    git.run(["log", "-n", count_arg.as_str(), "--oneline"])?;

    writeln!(ctx.console, "\nThis will squash the above {} commits into one!", count)?;
    if !ctx.confirm()? {
        return ctx.cancelled();
    }

    let message = match args.message.filter(|m| !m.trim().is_empty()) {
        Some(message) => message,
        None => {
            let subjects = git.output(["log", "-n", count_arg.as_str(), "--format=%s"])?;
            let fallback = default_message(&subjects);
            if args.ai {
                generated_message(ctx, count, fallback)?
            } else {
                fallback
            }
        }
    };
    debug!(%message, "squash message");

    writeln!(ctx.console, "\nResetting last {} commits...", count)?;
    git.run(["reset", "--soft", format!("HEAD~{}", count).as_str()])?;

    writeln!(ctx.console, "Creating new squashed commit...")?;
    git.run(["commit", "-m", message.as_str()])?;

    writeln!(ctx.console, "Successfully squashed {} commits!", count)?;
    Ok(())
}

fn parse_count(input: &str) -> Result<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 2 => Ok(n),
        _ => Err(Error::invalid_input(
            "please provide a valid number of commits (minimum 2)",
        )),
    }
}

/// AI message for the squashed commits, `fallback` when unavailable
fn generated_message(ctx: &mut Context<'_>, count: usize, fallback: String) -> Result<String> {
    let Some(generator) = ctx.message_generator() else {
        writeln!(ctx.console, "No OpenAI API key configured; using the default message")?;
        return Ok(fallback);
    };

    let messages = ctx
        .git()
        .output(["log", "-n", count.to_string().as_str(), "--format=%B"])?;
    writeln!(ctx.console, "Generating commit message...")?;
    match generator.generate(&messages) {
        Ok(message) => Ok(message),
        Err(e) => {
            warn!(error = %e, "message generation failed");
            writeln!(ctx.console, "Could not generate a message ({}); using the default", e)?;
            Ok(fallback)
        }
    }
}

/// `squash: a; b; c...` from `git log --format=%s` output
fn default_message(subjects: &str) -> String {
    let subjects: Vec<&str> = subjects
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut summary = subjects
        .iter()
        .take(SUMMARY_SUBJECTS)
        .copied()
        .collect::<Vec<_>>()
        .join("; ");
    if subjects.len() > SUMMARY_SUBJECTS {
        summary.push_str("...");
    }
    format!("squash: {}", summary)
}
