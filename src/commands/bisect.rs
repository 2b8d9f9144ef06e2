//! `bisect` - start a bisect session from two picked commits

use std::io::Write;

use super::Context;
use crate::error::Result;
use crate::git::parse::parse_oneline;
use crate::select::{SelectRequest, SelectableItem};

pub fn run(ctx: &mut Context<'_>) -> Result<()> {
    let git = ctx.git();
    git.ensure_repo()?;

    let mut commits = parse_oneline(&git.output(["log", "--oneline"])?);
    ctx.limit_for_list(&mut commits);

    let items: Vec<SelectableItem> = commits
        .iter()
        .map(|c| SelectableItem::new(format!("{} {}", c.hash, c.subject), c.hash.clone()))
        .collect();

    let good_request = SelectRequest::new("commit", items.clone())
        .heading("Select a known GOOD commit (where everything worked):")
        .preview("git show --color=always {}");
    let Some(good) = ctx.select_one(&good_request)?.into_option() else {
        return ctx.cancelled();
    };

    let bad_request = SelectRequest::new("commit", items)
        .heading("Select a known BAD commit (where the bug exists):")
        .preview("git show --color=always {}");
    let Some(bad) = ctx.select_one(&bad_request)?.into_option() else {
        return ctx.cancelled();
    };

    writeln!(ctx.console, "\nStarting git bisect...")?;
    git.run(["bisect", "start"])?;
    git.run(["bisect", "good", good.as_str()])?;
    git.run(["bisect", "bad", bad.as_str()])?;

    writeln!(
        ctx.console,
        "\nGit bisect is now running!\n\
         \n\
         1. Git checks out commits between {good} and {bad} for you to test\n\
         2. Mark each one with:\n   \
            git bisect good   (the bug is NOT present)\n   \
            git bisect bad    (the bug IS present)\n\
         \n\
         With a test script the search can run by itself:\n   \
            git bisect run ./test.sh\n\
         \n\
         To stop bisecting:\n   \
            git bisect reset"
    )?;
    Ok(())
}
