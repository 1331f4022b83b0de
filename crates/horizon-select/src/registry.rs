//! Option registry.
//!
//! The registry is the ordered set of options a select offers. It is rebuilt
//! from scratch whenever the declared option set changes; declaration order
//! is display order and is never re-sorted.

use horizon_select_core::logging::targets;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationWarning;

/// How a caller declares one option.
///
/// `text` is the searchable/display text. When it is absent, the simple
/// `label` (the plain string a presentation would render for the option) is
/// used instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptionDecl {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl OptionDecl {
    /// Declare an option with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
            label: None,
        }
    }

    /// Set the explicit text value.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the simple rendered label used when no text is given.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Shorthand for an option whose text is given explicitly.
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id).with_text(text)
    }
}

/// One registered option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub text: String,
}

/// Ordered mapping from option id to option.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    options: IndexMap<String, SelectOption>,
    warnings: Vec<ConfigurationWarning>,
}

impl OptionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from declared options.
    ///
    /// A duplicate id keeps the position of its first declaration and the
    /// text of its last one. Missing text and duplicate ids are recorded as
    /// [`ConfigurationWarning`]s; construction itself never fails.
    pub fn build<I>(decls: I) -> Self
    where
        I: IntoIterator<Item = OptionDecl>,
    {
        let mut registry = Self::new();
        for decl in decls {
            registry.register(decl);
        }
        tracing::debug!(
            target: targets::REGISTRY,
            options = registry.options.len(),
            warnings = registry.warnings.len(),
            "built option registry"
        );
        registry
    }

    fn register(&mut self, decl: OptionDecl) {
        let OptionDecl { id, text, label } = decl;

        let text = match text.or(label) {
            Some(text) => text,
            None => {
                self.warn(ConfigurationWarning::MissingText { id: id.clone() });
                String::new()
            }
        };

        if self.options.contains_key(&id) {
            self.warn(ConfigurationWarning::DuplicateId { id: id.clone() });
        }

        // IndexMap keeps the original slot for an existing key.
        self.options.insert(id.clone(), SelectOption { id, text });
    }

    fn warn(&mut self, warning: ConfigurationWarning) {
        tracing::warn!(target: targets::REGISTRY, id = warning.id(), "{}", warning);
        self.warnings.push(warning);
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SelectOption> {
        self.options.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.options.contains_key(id)
    }

    /// The text of `id`, or `None` for an unknown id.
    pub fn text(&self, id: &str) -> Option<&str> {
        self.options.get(id).map(|option| option.text.as_str())
    }

    /// Display position of `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.options.get_index_of(id)
    }

    /// Option ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.options.keys().map(String::as_str)
    }

    /// Options in display order.
    pub fn iter(&self) -> impl Iterator<Item = &SelectOption> + '_ {
        self.options.values()
    }

    /// Warnings produced while building this registry.
    pub fn warnings(&self) -> &[ConfigurationWarning] {
        &self.warnings
    }
}

impl FromIterator<OptionDecl> for OptionRegistry {
    fn from_iter<I: IntoIterator<Item = OptionDecl>>(iter: I) -> Self {
        Self::build(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> OptionRegistry {
        OptionRegistry::build([
            OptionDecl::text("cat", "Cat"),
            OptionDecl::text("dog", "Dog"),
            OptionDecl::text("cow", "Cow"),
        ])
    }

    #[test]
    fn test_declaration_order_is_display_order() {
        let registry = animals();
        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec!["cat", "dog", "cow"]);
        assert_eq!(registry.position("cow"), Some(2));
        assert!(registry.warnings().is_empty());
    }

    #[test]
    fn test_label_fallback() {
        let registry = OptionRegistry::build([OptionDecl::new("owl").with_label("Owl")]);
        assert_eq!(registry.text("owl"), Some("Owl"));
        assert!(registry.warnings().is_empty());
    }

    #[test]
    fn test_explicit_text_beats_label() {
        let registry =
            OptionRegistry::build([OptionDecl::new("owl").with_label("Owl").with_text("Barn owl")]);
        assert_eq!(registry.text("owl"), Some("Barn owl"));
    }

    #[test]
    fn test_missing_text_warns_and_uses_empty_string() {
        let registry = OptionRegistry::build([OptionDecl::new("ghost")]);
        assert_eq!(registry.text("ghost"), Some(""));
        assert_eq!(
            registry.warnings(),
            &[ConfigurationWarning::MissingText { id: "ghost".into() }]
        );
    }

    #[test]
    fn test_duplicate_id_last_wins_first_position() {
        let registry = OptionRegistry::build([
            OptionDecl::text("cat", "Cat"),
            OptionDecl::text("dog", "Dog"),
            OptionDecl::text("cat", "Kitty"),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.text("cat"), Some("Kitty"));
        assert_eq!(registry.position("cat"), Some(0));
        assert_eq!(
            registry.warnings(),
            &[ConfigurationWarning::DuplicateId { id: "cat".into() }]
        );
    }

    #[test]
    fn test_unknown_id() {
        let registry = animals();
        assert!(registry.get("emu").is_none());
        assert!(!registry.contains("emu"));
        assert_eq!(registry.text("emu"), None);
    }

    #[test]
    fn test_collect_from_iterator() {
        let registry: OptionRegistry = ["a", "b"]
            .into_iter()
            .map(|id| OptionDecl::text(id, id.to_uppercase()))
            .collect();
        assert_eq!(registry.iter().map(|o| o.text.as_str()).collect::<Vec<_>>(), ["A", "B"]);
    }
}
