//! `cherry-pick` - apply selected commits from a pull request

use std::io::Write;

use clap::Args;

use super::Context;
use crate::error::{Error, Result};
use crate::git::parse::parse_oneline;
use crate::select::{SelectRequest, SelectableItem};

#[derive(Debug, Args)]
pub struct CherryPickArgs {
    /// Pull request number
    pub pr: String,
}

pub fn run(ctx: &mut Context<'_>, args: CherryPickArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let pr: u64 = args
        .pr
        .trim()
        .parse()
        .map_err(|_| Error::invalid_input(format!("invalid PR number: {}", args.pr)))?;
    let local = format!("pr-{}", pr);

    writeln!(ctx.console, "Fetching PR #{}...", pr)?;
    git.run(["fetch".to_string(), "origin".to_string(), format!("pull/{}/head:{}", pr, local)])?;

    let commits = parse_oneline(&git.output([
        "log".to_string(),
        "--oneline".to_string(),
        "--reverse".to_string(),
        format!("HEAD..{}", local),
    ])?);
    if commits.is_empty() {
        writeln!(ctx.console, "PR #{} has no commits that are not already on this branch", pr)?;
        return Ok(());
    }

    let items = commits
        .iter()
        .map(|c| SelectableItem::new(format!("{} {}", c.hash, c.subject), c.hash.clone()))
        .collect();
    let request = SelectRequest::new("commit", items)
        .heading(format!("Commits in PR #{} (oldest first):", pr))
        .preview("git show --color=always {}");

    let Some(selected) = ctx.select_many(&request)?.into_option() else {
        return ctx.cancelled();
    };

    for hash in &selected {
        writeln!(ctx.console, "Cherry-picking commit {}...", hash)?;
        if let Err(e) = git.run(["cherry-pick", hash.as_str()]) {
            writeln!(
                ctx.console,
                "\nCherry-pick of {} stopped. Resolve the conflicts, then run:",
                hash
            )?;
            writeln!(ctx.console, "  git cherry-pick --continue")?;
            writeln!(ctx.console, "or give up with:")?;
            writeln!(ctx.console, "  git cherry-pick --abort")?;
            return Err(e);
        }
    }

    writeln!(ctx.console, "Successfully cherry-picked {} commit(s)!", selected.len())?;
    Ok(())
}
