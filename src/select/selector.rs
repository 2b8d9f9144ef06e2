//! Strategy selection and the shared selection contract

use tracing::debug;

use super::{fuzzy, list, MultiSelection, SelectRequest, Selection};
use crate::console::Console;
use crate::error::{Error, Result};
use crate::process::ProcessRunner;

/// How the user will be asked to choose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Items piped through the external fuzzy finder
    Fuzzy,
    /// Numbered menu on the console
    List,
}

/// Chooses between the fuzzy finder and the numbered list
///
/// The fuzzy finder is used when it is installed and not disabled by
/// configuration; the list is always available.
pub struct Selector<'a> {
    runner: &'a dyn ProcessRunner,
    fuzzy_disabled: bool,
}

impl<'a> Selector<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, fuzzy_disabled: bool) -> Self {
        Self {
            runner,
            fuzzy_disabled,
        }
    }

    pub fn strategy(&self) -> Strategy {
        if !self.fuzzy_disabled && self.runner.is_installed(fuzzy::FZF) {
            Strategy::Fuzzy
        } else {
            Strategy::List
        }
    }

    /// Ask for exactly one item
    pub fn select_one(&self, console: &mut Console, request: &SelectRequest) -> Result<Selection> {
        ensure_items(request)?;
        let strategy = self.strategy();
        debug!(?strategy, items = request.items.len(), noun = %request.noun, "selecting");
        match strategy {
            Strategy::Fuzzy => fuzzy::select_one(self.runner, request),
            Strategy::List => list::select_one(console, request),
        }
    }

    /// Ask for any number of items, in the order the user picks them
    pub fn select_many(
        &self,
        console: &mut Console,
        request: &SelectRequest,
    ) -> Result<MultiSelection> {
        ensure_items(request)?;
        let strategy = self.strategy();
        debug!(?strategy, items = request.items.len(), noun = %request.noun, "selecting many");
        match strategy {
            Strategy::Fuzzy => fuzzy::select_many(self.runner, request),
            Strategy::List => list::select_many(console, request),
        }
    }
}

fn ensure_items(request: &SelectRequest) -> Result<()> {
    if request.items.is_empty() {
        return Err(Error::precondition(format!(
            "nothing to select from: no {} available",
            request.noun
        )));
    }
    Ok(())
}
