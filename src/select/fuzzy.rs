//! fzf-backed selection
//!
//! Each item is fed as `<index>\t<preview key>\t<label>`; fzf only displays the
//! label (`--with-nth 3..`) and hands the whole line back, so the index maps the
//! choice back to its identifier even when labels repeat. Any non-zero exit
//! (Esc, Ctrl-C, no match) is a cancellation.

use tracing::debug;

use super::{MultiSelection, SelectRequest, Selection};
use crate::error::{Error, Result};
use crate::process::{CommandSpec, Mode, ProcessRunner};

pub const FZF: &str = "fzf";

pub(super) fn select_one(runner: &dyn ProcessRunner, request: &SelectRequest) -> Result<Selection> {
    Ok(match run(runner, request, false)? {
        Some(mut ids) if !ids.is_empty() => Selection::Selected(ids.remove(0)),
        _ => Selection::Cancelled,
    })
}

pub(super) fn select_many(
    runner: &dyn ProcessRunner,
    request: &SelectRequest,
) -> Result<MultiSelection> {
    Ok(match run(runner, request, true)? {
        Some(ids) if !ids.is_empty() => MultiSelection::Selected(ids),
        _ => MultiSelection::Cancelled,
    })
}

/// `None` when the user backed out
fn run(
    runner: &dyn ProcessRunner,
    request: &SelectRequest,
    multi: bool,
) -> Result<Option<Vec<String>>> {
    let spec = build_command(request, multi);
    let outcome = runner.run(&spec)?;

    if !outcome.success() {
        debug!(code = ?outcome.code, "fzf exited without a selection");
        return Ok(None);
    }

    let mut ids = Vec::new();
    for line in outcome.stdout.lines().filter(|l| !l.trim().is_empty()) {
        ids.push(resolve_line(line, request)?);
    }
    Ok(Some(ids))
}

pub(super) fn build_command(request: &SelectRequest, multi: bool) -> CommandSpec {
    let mut spec = CommandSpec::new(FZF)
        .args(["--height", "50%", "--reverse"])
        .args(["--delimiter", "\t", "--with-nth", "3.."])
        .arg("--prompt")
        .arg(format!("{}> ", request.noun));

    if request.ansi {
        spec = spec.arg("--ansi");
    }
    if multi {
        spec = spec.arg("--multi");
    }
    if let Some(preview) = &request.preview {
        spec = spec
            .arg("--preview")
            .arg(preview.replace("{}", "{2}"))
            .arg("--preview-window")
            .arg(request.preview_window.clone());
    }

    spec.mode(Mode::CaptureStdout).stdin(render_input(request))
}

fn render_input(request: &SelectRequest) -> String {
    let mut input = String::new();
    for (i, item) in request.items.iter().enumerate() {
        input.push_str(&format!("{}\t{}\t{}\n", i, item.preview_key(), item.label()));
    }
    input
}

fn resolve_line(line: &str, request: &SelectRequest) -> Result<String> {
    line.split('\t')
        .next()
        .and_then(|index| index.trim().parse::<usize>().ok())
        .and_then(|index| request.items.get(index))
        .map(|item| item.id().to_string())
        .ok_or_else(|| Error::InvalidSelection(line.to_string()))
}
