//! Selection model.
//!
//! Pure reducers over [`SelectionValue`]. Nothing here touches the
//! controller; the controller decides what a commit means for the open state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::{OptionRegistry, SelectOption};

/// Whether a select holds one value or an ordered set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Single => f.write_str("single-selection"),
            SelectionMode::Multiple => f.write_str("multiple-selection"),
        }
    }
}

/// The caller-owned selection.
///
/// `Multiple(None)` means the value was never touched and `Multiple(Some(vec![]))`
/// that it was cleared. Both display as empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionValue {
    Single(Option<String>),
    Multiple(Option<Vec<String>>),
}

impl Default for SelectionValue {
    fn default() -> Self {
        SelectionValue::Single(None)
    }
}

impl SelectionValue {
    /// The untouched value for `mode`.
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => SelectionValue::Single(None),
            SelectionMode::Multiple => SelectionValue::Multiple(None),
        }
    }

    /// A single-mode value holding `id`.
    pub fn single(id: impl Into<String>) -> Self {
        SelectionValue::Single(Some(id.into()))
    }

    /// A multiple-mode value holding `ids` in order.
    pub fn multiple<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SelectionValue::Multiple(Some(ids.into_iter().map(Into::into).collect()))
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            SelectionValue::Single(_) => SelectionMode::Single,
            SelectionValue::Multiple(_) => SelectionMode::Multiple,
        }
    }

    /// Selected ids in order. Stale ids are included.
    pub fn ids(&self) -> &[String] {
        match self {
            SelectionValue::Single(Some(id)) => std::slice::from_ref(id),
            SelectionValue::Multiple(Some(ids)) => ids,
            SelectionValue::Single(None) | SelectionValue::Multiple(None) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids().iter().any(|selected| selected == id)
    }

    /// Compare two values as id sequences, treating "never touched" and
    /// "cleared" as equal.
    pub fn same_selection(&self, other: &SelectionValue) -> bool {
        self.mode() == other.mode() && self.ids() == other.ids()
    }

    /// The value after activating `id`.
    ///
    /// Single mode replaces the value, or clears it when `id` is already
    /// selected. Multiple mode appends an absent id and removes a present one,
    /// keeping the order of the rest.
    pub fn toggle(&self, id: &str) -> SelectionValue {
        match self {
            SelectionValue::Single(current) => {
                if current.as_deref() == Some(id) {
                    SelectionValue::Single(None)
                } else {
                    SelectionValue::Single(Some(id.to_string()))
                }
            }
            SelectionValue::Multiple(current) => {
                let mut ids = current.clone().unwrap_or_default();
                if let Some(index) = ids.iter().position(|selected| selected == id) {
                    ids.remove(index);
                } else {
                    ids.push(id.to_string());
                }
                SelectionValue::Multiple(Some(ids))
            }
        }
    }

    /// Drop the most recently appended id (multiple mode only).
    ///
    /// Returns an identical value when there is nothing to drop.
    pub fn remove_last(&self) -> SelectionValue {
        match self {
            SelectionValue::Multiple(Some(ids)) if !ids.is_empty() => {
                SelectionValue::Multiple(Some(ids[..ids.len() - 1].to_vec()))
            }
            _ => self.clone(),
        }
    }

    /// Drop `id` wherever it is (multiple mode only).
    pub fn remove(&self, id: &str) -> SelectionValue {
        match self {
            SelectionValue::Multiple(Some(ids)) if ids.iter().any(|selected| selected == id) => {
                SelectionValue::Multiple(Some(
                    ids.iter().filter(|selected| *selected != id).cloned().collect(),
                ))
            }
            _ => self.clone(),
        }
    }

    /// Registered options for the selected ids, skipping stale ids.
    pub fn selected_options<'r>(&self, registry: &'r OptionRegistry) -> Vec<&'r SelectOption> {
        self.ids().iter().filter_map(|id| registry.get(id)).collect()
    }

    /// Selected option texts joined with `separator`, or `None` when nothing
    /// registered is selected.
    pub fn display_text(&self, registry: &OptionRegistry, separator: &str) -> Option<String> {
        let texts: Vec<&str> = self
            .selected_options(registry)
            .into_iter()
            .map(|option| option.text.as_str())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join(separator))
        }
    }
}

/// Activate `id` under `mode`.
///
/// A `current` value of the other mode is treated as the empty value of
/// `mode`.
pub fn toggle(mode: SelectionMode, current: &SelectionValue, id: &str) -> SelectionValue {
    if current.mode() == mode {
        current.toggle(id)
    } else {
        SelectionValue::empty(mode).toggle(id)
    }
}

/// Drop the last selected id under `mode`. A no-op in single mode.
pub fn remove_last(mode: SelectionMode, current: &SelectionValue) -> SelectionValue {
    match mode {
        SelectionMode::Multiple => current.remove_last(),
        SelectionMode::Single => current.clone(),
    }
}
