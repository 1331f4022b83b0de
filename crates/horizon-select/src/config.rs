//! Select configuration.
//!
//! A [`SelectConfig`] describes one select: its options, mode, placeholder,
//! dismissal behaviour and panel placement. It can be built in code or loaded
//! from TOML:
//!
//! ```
//! use horizon_select::SelectConfig;
//!
//! let config = SelectConfig::from_toml_str(r#"
//! base_id = "pet"
//! placeholder = "Pick a pet"
//! mode = "multiple"
//!
//! [dismiss]
//! focus_loss = false
//!
//! [[options]]
//! id = "cat"
//! text = "Cat"
//!
//! [[options]]
//! id = "dog"
//! label = "Dog"
//! "#).unwrap();
//!
//! assert_eq!(config.options.len(), 2);
//! assert!(!config.dismiss.flags().close_on_focus_loss());
//! ```

use std::path::Path;

use horizon_select_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::dismiss::DismissFlags;
use crate::error::{SelectError, SelectResult};
use crate::input::Key;
use crate::placement::{AnchoredPlacement, PanelPlacement};
use crate::registry::OptionDecl;
use crate::selection::SelectionMode;

/// Mount notifications during which a pending open-focus is retried.
pub const DEFAULT_FOCUS_RETRY_WINDOW: u32 = 4;

/// Separator used when joining selected option texts.
pub const DEFAULT_DISPLAY_SEPARATOR: &str = ", ";

/// Configuration for one select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Base for element ids. Generated when absent.
    pub base_id: Option<String>,
    /// Shown on the trigger when nothing registered is selected.
    pub placeholder: String,
    pub mode: SelectionMode,
    /// Keys that activate the focused option.
    pub commit_keys: Vec<Key>,
    /// How many view mount notifications may retry the open-focus attempt.
    pub focus_retry_window: u32,
    pub placement: PanelPlacement,
    /// Vertical gap between trigger and panel.
    pub panel_gap: f32,
    /// Joins selected texts on the trigger.
    pub display_separator: String,
    pub dismiss: DismissConfig,
    pub options: Vec<OptionDecl>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            base_id: None,
            placeholder: String::new(),
            mode: SelectionMode::Single,
            commit_keys: vec![Key::Enter, Key::Space],
            focus_retry_window: DEFAULT_FOCUS_RETRY_WINDOW,
            placement: PanelPlacement::default(),
            panel_gap: 0.0,
            display_separator: DEFAULT_DISPLAY_SEPARATOR.to_string(),
            dismiss: DismissConfig::default(),
            options: Vec::new(),
        }
    }
}

impl SelectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = Some(base_id.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = OptionDecl>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn with_dismiss(mut self, dismiss: DismissConfig) -> Self {
        self.dismiss = dismiss;
        self
    }

    pub fn with_commit_keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.commit_keys = keys.into_iter().collect();
        self
    }

    pub fn with_focus_retry_window(mut self, window: u32) -> Self {
        self.focus_retry_window = window;
        self
    }

    pub fn with_placement(mut self, placement: PanelPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> SelectResult<Self> {
        let config: SelectConfig = toml::from_str(text)?;
        tracing::debug!(
            target: targets::CONFIG,
            options = config.options.len(),
            mode = %config.mode,
            "parsed select configuration"
        );
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> SelectResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| SelectError::io(path, err))?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> SelectResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// The default positioning coordinator for this configuration.
    pub fn anchored_placement(&self) -> AnchoredPlacement {
        AnchoredPlacement::new(self.placement).with_gap(self.panel_gap)
    }
}

/// Which dismissal triggers are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DismissConfig {
    pub outside_pointer: bool,
    pub escape: bool,
    pub focus_loss: bool,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self {
            outside_pointer: true,
            escape: true,
            focus_loss: true,
        }
    }
}

impl DismissConfig {
    pub fn flags(&self) -> DismissFlags {
        let mut flags = DismissFlags::NONE;
        if self.outside_pointer {
            flags |= DismissFlags::OUTSIDE_POINTER;
        }
        if self.escape {
            flags |= DismissFlags::ESCAPE;
        }
        if self.focus_loss {
            flags |= DismissFlags::FOCUS_LOSS;
        }
        flags
    }
}

impl From<DismissFlags> for DismissConfig {
    fn from(flags: DismissFlags) -> Self {
        Self {
            outside_pointer: flags.close_on_outside_pointer(),
            escape: flags.close_on_escape(),
            focus_loss: flags.close_on_focus_loss(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SelectConfig::default();
        assert_eq!(config.mode, SelectionMode::Single);
        assert_eq!(config.commit_keys, vec![Key::Enter, Key::Space]);
        assert_eq!(config.dismiss.flags(), DismissFlags::DEFAULT);
        assert_eq!(config.focus_retry_window, DEFAULT_FOCUS_RETRY_WINDOW);
        assert_eq!(config.display_separator, ", ");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SelectConfig::from_toml_str("").unwrap(), SelectConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let config = SelectConfig::from_toml_str(
            r#"
            base_id = "pet"
            placeholder = "Pick a pet"
            mode = "multiple"
            commit_keys = ["enter"]
            focus_retry_window = 2
            placement = "above-align-right"
            panel_gap = 4.0

            [dismiss]
            outside_pointer = false

            [[options]]
            id = "cat"
            text = "Cat"

            [[options]]
            id = "owl"
            label = "Owl"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_id.as_deref(), Some("pet"));
        assert_eq!(config.mode, SelectionMode::Multiple);
        assert_eq!(config.commit_keys, vec![Key::Enter]);
        assert_eq!(config.placement, PanelPlacement::AboveAlignRight);
        assert_eq!(config.dismiss.flags(), DismissFlags::ESCAPE | DismissFlags::FOCUS_LOSS);
        assert_eq!(config.options[1], OptionDecl::new("owl").with_label("Owl"));
        assert_eq!(config.anchored_placement().gap, 4.0);
    }

    #[test]
    fn test_invalid_toml() {
        let err = SelectConfig::from_toml_str("mode = \"sideways\"").unwrap_err();
        assert!(matches!(err, SelectError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SelectConfig::load("/nonexistent/select.toml").unwrap_err();
        assert!(matches!(err, SelectError::Io { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SelectConfig::new()
            .with_base_id("pet")
            .with_mode(SelectionMode::Multiple)
            .with_options([OptionDecl::text("cat", "Cat")]);
        let text = config.to_toml_string().unwrap();
        assert_eq!(SelectConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_flags_conversion() {
        let dismiss = DismissConfig::from(DismissFlags::ESCAPE);
        assert!(!dismiss.outside_pointer);
        assert!(dismiss.escape);
        assert_eq!(dismiss.flags(), DismissFlags::ESCAPE);
    }
}
