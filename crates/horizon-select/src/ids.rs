//! Element ids for a select's parts.
//!
//! Presentations use these to wire accessibility relations: the list box is
//! labelled by the label, the trigger controls the list box, and the list box
//! points at the focused option as its active descendant.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BASE_ID: AtomicU64 = AtomicU64::new(1);

/// Ids derived from one base id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementIds {
    base: String,
}

impl ElementIds {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Ids under a fresh process-unique base such as `select-3`.
    pub fn generate() -> Self {
        let n = NEXT_BASE_ID.fetch_add(1, Ordering::Relaxed);
        Self::new(format!("select-{n}"))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn label(&self) -> String {
        format!("{}-label", self.base)
    }

    pub fn trigger(&self) -> String {
        format!("{}-trigger", self.base)
    }

    /// Id of the floating panel.
    pub fn dropdown(&self) -> String {
        format!("{}-dropdown", self.base)
    }

    pub fn search(&self) -> String {
        format!("{}-search", self.base)
    }

    pub fn listbox(&self) -> String {
        format!("{}-listbox", self.base)
    }

    /// Element id of the option with `option_id`.
    pub fn option(&self, option_id: &str) -> String {
        format!("{}-option-{}", self.base, option_id)
    }
}
