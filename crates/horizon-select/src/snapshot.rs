//! Read-only state handed to presentations.

use crate::controller::OpenState;
use crate::filter::{FilterState, MatchSpan};
use crate::placement::Placement;
use crate::selection::SelectionValue;

/// Everything a presentation needs to render a select at one instant.
///
/// Snapshots are copies; they never change after they are taken.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectSnapshot {
    pub open: OpenState,
    pub selection_value: SelectionValue,
    pub filter_state: FilterState,
    pub focus_cursor: Option<String>,
    pub placeholder_text: String,
    /// Trigger text: selected option texts, or the placeholder.
    pub display_text: String,
    pub placement: Option<Placement>,
    /// Render state of each matched option, in display order.
    pub options: Vec<OptionState>,
}

impl SelectSnapshot {
    pub fn is_open(&self) -> bool {
        self.open == OpenState::Open
    }

    pub fn option(&self, id: &str) -> Option<&OptionState> {
        self.options.iter().find(|option| option.id == id)
    }
}

/// Render state of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionState {
    pub id: String,
    pub text: String,
    pub is_focused: bool,
    pub is_selected: bool,
    pub spans: Vec<MatchSpan>,
}
