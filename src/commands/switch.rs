//! `switch` - pick a branch and check it out

use std::io::Write;

use clap::{Args, ValueEnum};

use super::Context;
use crate::error::Result;
use crate::git::parse::{parse_branches, Branch, BRANCH_FORMAT};
use crate::select::{SelectRequest, SelectableItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Most recently committed first
    #[default]
    Date,
    /// Alphabetical
    Name,
}

#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Include remote-tracking branches
    #[arg(long)]
    pub all: bool,

    /// Sort order of the branch list
    #[arg(long, value_enum, default_value_t = SortOrder::Date)]
    pub sort: SortOrder,
}

pub fn run(ctx: &mut Context<'_>, args: SwitchArgs) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;
    git.ensure_clean("switching branches")?;

    let mut list_args = vec!["branch"];
    if args.all {
        list_args.push("-a");
    }
    list_args.push(BRANCH_FORMAT);

    let mut branches = parse_branches(&git.output(list_args)?);
    sort_branches(&mut branches, args.sort);

    let items = branches
        .iter()
        .map(|b| SelectableItem::new(label(b), b.name.clone()))
        .collect();
    let request = SelectRequest::new("branch", items)
        .heading("Available branches:")
        .preview("git log --color=always --oneline --graph {}");

    let Some(branch) = ctx.select_one(&request)?.into_option() else {
        return ctx.cancelled();
    };

    writeln!(ctx.console, "Switching to branch '{}'...", branch)?;
    git.run(["checkout", branch.as_str()])?;
    writeln!(ctx.console, "Switched to branch '{}'", branch)?;
    Ok(())
}

fn sort_branches(branches: &mut [Branch], order: SortOrder) {
    match order {
        // Undated entries sink to the bottom
        SortOrder::Date => branches.sort_by(|a, b| b.committed.cmp(&a.committed)),
        SortOrder::Name => branches.sort_by(|a, b| a.name.cmp(&b.name)),
    }
}

fn label(branch: &Branch) -> String {
    let marker = if branch.is_current { "* " } else { "" };
    let date = branch
        .committed
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!("{}{} ({}) - {}", marker, branch.name, date, branch.subject)
}
