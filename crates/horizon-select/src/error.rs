//! Error types for the select engine.

use std::path::PathBuf;

use crate::input::ListenerKind;
use crate::selection::SelectionMode;

/// Result type alias for select operations.
pub type SelectResult<T> = std::result::Result<T, SelectError>;

/// Errors returned by the select engine.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// A session-scoped operation was invoked while the select is closed.
    ///
    /// This indicates a wiring bug in the presentation layer, for example an
    /// option fragment rendered outside an open panel.
    #[error("'{operation}' requires an open select session")]
    MissingContext { operation: &'static str },

    /// A selection value of the wrong variant was fed back to the controller.
    #[error("selection value is {found} but the select is {expected}")]
    ModeMismatch {
        expected: SelectionMode,
        found: SelectionMode,
    },

    /// Configuration text could not be parsed.
    #[error("Invalid select configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be written as TOML.
    #[error("Failed to serialize select configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Configuration file could not be read.
    #[error("Failed to read select configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SelectError {
    /// Create a missing-context error for `operation`.
    pub fn missing_context(operation: &'static str) -> Self {
        Self::MissingContext { operation }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error reports a session-scoped call made while closed.
    pub fn is_missing_context(&self) -> bool {
        matches!(self, Self::MissingContext { .. })
    }
}

/// Non-fatal problems found while building the option registry.
///
/// Warnings are logged when they are produced and kept on the registry so
/// hosts can surface them in their own diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationWarning {
    /// An option declared neither text nor a simple label.
    #[error("option '{id}' has no text value and no simple label; searching and display use an empty string")]
    MissingText { id: String },

    /// An option id was declared more than once.
    #[error("option id '{id}' is declared more than once; the last declaration wins")]
    DuplicateId { id: String },
}

impl ConfigurationWarning {
    /// The option id the warning refers to.
    pub fn id(&self) -> &str {
        match self {
            Self::MissingText { id } | Self::DuplicateId { id } => id,
        }
    }
}

/// A dismissal listener could not be attached.
///
/// The controller logs this and keeps the session open; only the dismissal
/// path served by that listener is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} listener unavailable: {reason}")]
pub struct AttachError {
    pub kind: ListenerKind,
    pub reason: String,
}

impl AttachError {
    pub fn new(kind: ListenerKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_context_message() {
        let err = SelectError::missing_context("option_activate");
        assert!(err.is_missing_context());
        assert_eq!(
            err.to_string(),
            "'option_activate' requires an open select session"
        );
    }

    #[test]
    fn test_mode_mismatch_message() {
        let err = SelectError::ModeMismatch {
            expected: SelectionMode::Single,
            found: SelectionMode::Multiple,
        };
        assert_eq!(
            err.to_string(),
            "selection value is multiple-selection but the select is single-selection"
        );
    }

    #[test]
    fn test_warning_id() {
        let warning = ConfigurationWarning::DuplicateId { id: "cat".into() };
        assert_eq!(warning.id(), "cat");
        assert!(warning.to_string().contains("last declaration wins"));
    }

    #[test]
    fn test_attach_error_message() {
        let err = AttachError::new(ListenerKind::FocusChange, "no focus tracking");
        assert_eq!(
            err.to_string(),
            "focus-change listener unavailable: no focus tracking"
        );
    }
}
