//! Selection inputs and outcomes

/// One choice offered to the user
///
/// The label is shown verbatim; the identifier is what the caller gets back.
/// Labels are expected to be single lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableItem {
    label: String,
    id: String,
    preview_key: Option<String>,
}

impl SelectableItem {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
            preview_key: None,
        }
    }

    /// An item whose label doubles as its identifier (file paths, worktrees)
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(value.clone(), value)
    }

    /// Key substituted into the preview command (defaults to the identifier)
    pub fn with_preview_key(mut self, key: impl Into<String>) -> Self {
        self.preview_key = Some(key.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn preview_key(&self) -> &str {
        self.preview_key.as_deref().unwrap_or(&self.id)
    }
}

/// Outcome of a single-choice selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(String),
    Cancelled,
}

impl Selection {
    pub fn into_option(self) -> Option<String> {
        match self {
            Selection::Selected(id) => Some(id),
            Selection::Cancelled => None,
        }
    }
}

/// Outcome of a multi-choice selection, in the order the user picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSelection {
    Selected(Vec<String>),
    Cancelled,
}

impl MultiSelection {
    pub fn into_option(self) -> Option<Vec<String>> {
        match self {
            MultiSelection::Selected(ids) if !ids.is_empty() => Some(ids),
            _ => None,
        }
    }
}

/// What to show and how to preview it
#[derive(Debug, Clone)]
pub struct SelectRequest {
    /// Singular name of the thing being chosen ("branch", "commit", ...)
    pub noun: String,
    /// Header printed above the numbered list
    pub heading: String,
    pub items: Vec<SelectableItem>,
    /// Shell command run by the fuzzy finder for the highlighted item.
    /// `{}` is replaced with the item's preview key.
    pub preview: Option<String>,
    pub preview_window: String,
    /// Labels contain ANSI colour codes
    pub ansi: bool,
}

impl SelectRequest {
    pub fn new(noun: impl Into<String>, items: Vec<SelectableItem>) -> Self {
        let noun = noun.into();
        Self {
            heading: format!("Choose a {}:", noun),
            noun,
            items,
            preview: None,
            preview_window: "right:50%".to_string(),
            ansi: false,
        }
    }

    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    pub fn preview(mut self, command: impl Into<String>) -> Self {
        self.preview = Some(command.into());
        self
    }

    pub fn preview_window(mut self, window: impl Into<String>) -> Self {
        self.preview_window = window.into();
        self
    }

    pub fn ansi(mut self) -> Self {
        self.ansi = true;
        self
    }
}
