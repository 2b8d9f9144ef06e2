//! Numbered-menu fallback
//!
//! Prints `<index>: <label>` lines and reads a 1-based index. Empty input
//! cancels; anything that is not an in-range number is an invalid selection.

use std::io::Write;

use super::{MultiSelection, SelectRequest, Selection};
use crate::console::Console;
use crate::error::{Error, Result};

pub(super) fn select_one(console: &mut Console, request: &SelectRequest) -> Result<Selection> {
    print_menu(console, request)?;
    let input = console.prompt(format_args!(
        "\nSelect {} number (or press Enter to cancel): ",
        request.noun
    ))?;

    if input.is_empty() {
        return Ok(Selection::Cancelled);
    }

    let index = parse_index(&input, request.items.len())?;
    Ok(Selection::Selected(request.items[index].id().to_string()))
}

pub(super) fn select_many(
    console: &mut Console,
    request: &SelectRequest,
) -> Result<MultiSelection> {
    print_menu(console, request)?;
    let input = console.prompt(format_args!(
        "\nSelect {} numbers, separated by commas or spaces (or press Enter to cancel): ",
        request.noun
    ))?;

    if input.is_empty() {
        return Ok(MultiSelection::Cancelled);
    }

    let indices = parse_indices(&input, request.items.len())?;
    Ok(MultiSelection::Selected(
        indices
            .into_iter()
            .map(|i| request.items[i].id().to_string())
            .collect(),
    ))
}

fn print_menu(console: &mut Console, request: &SelectRequest) -> Result<()> {
    writeln!(console, "\n{}", request.heading)?;
    for (i, item) in request.items.iter().enumerate() {
        writeln!(console, "{}: {}", i + 1, item.label())?;
    }
    Ok(())
}

/// Parse a 1-based index into a 0-based one
fn parse_index(input: &str, len: usize) -> Result<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Ok(n - 1),
        _ => Err(Error::InvalidSelection(input.trim().to_string())),
    }
}

/// Parse `"3, 1 2"` into `[2, 0, 1]`, keeping typed order and dropping repeats
fn parse_indices(input: &str, len: usize) -> Result<Vec<usize>> {
    let mut indices = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let index =
            parse_index(token, len).map_err(|_| Error::InvalidSelection(input.to_string()))?;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    if indices.is_empty() {
        return Err(Error::InvalidSelection(input.to_string()));
    }
    Ok(indices)
}
