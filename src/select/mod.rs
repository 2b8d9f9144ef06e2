//! Interactive selection
//!
//! Presents an ordered list of items and returns the chosen identifier(s):
//! - `Selector` - Picks a strategy and enforces the shared contract
//! - fuzzy strategy - Pipes labels through `fzf` with a per-item preview
//! - list strategy - Numbered menu read from the console
//!
//! A cancelled selection is a value, never an error.

mod fuzzy;
mod item;
mod list;
mod selector;

pub use item::*;
pub use selector::*;
