//! User intents as values.
//!
//! Every input the controller understands can be expressed as a
//! [`SelectIntent`] and routed through
//! [`SelectController::dispatch`](crate::SelectController::dispatch). Hosts
//! with an event queue can push intents and drain them in order.

use crate::input::Key;
use crate::view::{ViewId, ViewRole};

#[derive(Debug, Clone, PartialEq)]
pub enum SelectIntent {
    /// Trigger activated: open when closed, close when open.
    OpenToggle,
    Open,
    Close,
    /// A pointer press landed on `target` (`None`: on no known view).
    PointerDownOutside(Option<ViewId>),
    KeyInput(Key),
    /// The pointer moved over an option.
    OptionPointerOver(String),
    /// An option was clicked or otherwise activated.
    OptionActivate(String),
    /// The search text changed.
    QueryChanged(String),
    ClearQuery,
    /// Keyboard focus moved to `target` (`None`: nothing focused).
    FocusMoved(Option<ViewId>),
    ViewMounted(ViewRole, ViewId),
    ViewUnmounted(ViewRole),
    /// Trigger or panel bounds changed.
    GeometryChanged,
    /// Remove the last selected id (multiple selection).
    RemoveLast,
    /// Remove one selected id, e.g. from a chip's remove button.
    RemoveSelected(String),
}

impl SelectIntent {
    /// Intents that only make sense inside an open session.
    pub fn is_session_scoped(&self) -> bool {
        matches!(
            self,
            SelectIntent::OptionPointerOver(_)
                | SelectIntent::OptionActivate(_)
                | SelectIntent::QueryChanged(_)
        )
    }
}
