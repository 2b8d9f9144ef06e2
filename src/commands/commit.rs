//! `commit` - build a conventional commit message for the staged changes
//!
//! The message starts from a `<type>: ` template (or an AI suggestion), gets
//! the staged stat appended as `#` comments, and is opened in the editor.
//! Comment and blank lines are dropped before committing.

use std::io::Write;

use clap::Args;
use tracing::debug;

use super::Context;
use crate::ai::MessageGenerator;
use crate::error::{ConfigError, Error, Result};
use crate::process::CommandSpec;

/// Conventional commit types offered by the menu
pub const COMMIT_TYPES: [(&str, &str); 7] = [
    ("feat", "A new feature"),
    ("fix", "A bug fix"),
    ("docs", "Documentation only changes"),
    ("style", "Changes that don't affect the meaning of the code"),
    ("refactor", "Code change that neither fixes a bug nor adds a feature"),
    ("test", "Adding missing tests or correcting existing tests"),
    ("chore", "Changes to the build process or auxiliary tools"),
];

#[derive(Debug, Args)]
pub struct CommitArgs {
    /// Commit without opening the editor
    #[arg(short, long)]
    pub no_edit: bool,

    /// Commit type (feat, fix, docs, ...)
    #[arg(short = 't', long = "type")]
    pub commit_type: Option<String>,

    /// Generate the message from the staged diff
    #[arg(short, long)]
    pub ai: bool,
}

pub fn run(ctx: &mut Context<'_>, args: CommitArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let stat = git.output(["diff", "--cached", "--stat"])?;
    if stat.trim().is_empty() {
        return Err(Error::precondition(
            "no staged changes found; use 'git add' to stage changes",
        ));
    }

    let head = if args.ai {
        ai_message(ctx)?
    } else {
        let commit_type = match args.commit_type.filter(|t| !t.trim().is_empty()) {
            Some(t) => t,
            None => match prompt_type(ctx)? {
                Some(t) => t,
                None => return ctx.cancelled(),
            },
        };
        format!("{}: ", commit_type)
    };

    let mut message = template(&head, &stat, args.ai);
    if !args.no_edit {
        message = edit(ctx, &message)?;
    }

    let message = strip_comments(&message);
    if message.is_empty() {
        writeln!(ctx.console, "Empty commit message")?;
        return ctx.cancelled();
    }
    debug!(%message, "committing");

    git.run(["commit", "-m", message.as_str()])?;
    Ok(())
}

fn ai_message(ctx: &mut Context<'_>) -> Result<String> {
    let generator = ctx.message_generator().ok_or_else(|| ConfigError::Missing {
        key: "openai_api_key".to_string(),
        hint: "set GITHELPER_OPENAI_API_KEY or add openai_api_key to ~/.githelper.yaml".to_string(),
    })?;
    let diff = ctx.git().output(["diff", "--cached"])?;
    writeln!(ctx.console, "Generating commit message...")?;
    generator.generate(&diff)
}

/// Numbered type menu; accepts a number or a type name
fn prompt_type(ctx: &mut Context<'_>) -> Result<Option<String>> {
    writeln!(ctx.console, "Available commit types:")?;
    for (i, (name, description)) in COMMIT_TYPES.iter().enumerate() {
        writeln!(ctx.console, "{}. {:<8} - {}", i + 1, name, description)?;
    }
    let input = ctx.console.prompt("\nEnter commit type (or number): ")?;
    if input.is_empty() {
        return Ok(None);
    }
    let chosen = input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| COMMIT_TYPES.get(i))
        .map(|(name, _)| name.to_string())
        .unwrap_or(input);
    Ok(Some(chosen))
}

fn template(head: &str, stat: &str, ai: bool) -> String {
    let mut message = format!("{}\n\n# Changes to be committed:\n", head);
    for line in stat.lines() {
        message.push_str(&format!("# {}\n", line));
    }
    if ai {
        message.push_str("\n# AI-generated commit message above\n");
    }
    message.push_str("# Lines starting with '#' will be ignored\n");
    message
}

/// Open `message` in the configured editor and return what was saved
fn edit(ctx: &mut Context<'_>, message: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("COMMIT_EDITMSG")
        .tempfile()?;
    std::fs::write(file.path(), message)?;

    let spec = editor_command(&ctx.config.resolve_editor(), &file.path().display().to_string());
    debug!(command = %spec.display(), "opening editor");
    ctx.runner.checked(&spec)?;

    Ok(std::fs::read_to_string(file.path())?)
}

/// The editor setting is shell syntax (`code --wait`, quoted paths), so let
/// `sh` parse it and pass the file as a positional argument.
fn editor_command(editor: &str, file: &str) -> CommandSpec {
    CommandSpec::new("sh")
        .arg("-c")
        .arg(format!("{} \"$@\"", editor))
        .arg("githelper-editor")
        .arg(file)
        .interactive()
}

fn strip_comments(message: &str) -> String {
    message
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}
