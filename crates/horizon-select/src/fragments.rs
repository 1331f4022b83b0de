//! Presentation-facing props for the parts of a select.
//!
//! A host renders a select as separate fragments (trigger, panel, search
//! surface, list box and one fragment per option) and hands each renderer a
//! `&SelectController`. The props here are everything a renderer needs,
//! including the accessibility state, derived on demand.
//!
//! Everything except the trigger lives inside the open panel, so those props
//! are only available while the select is open.

use crate::controller::SelectController;
use crate::error::SelectResult;
use crate::filter::MatchSpan;
use crate::placement::Placement;

/// Value of `has_popup` on the trigger.
pub const POPUP_KIND: &str = "listbox";

/// Props for the trigger button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerProps {
    pub id: String,
    /// Element id of the label.
    pub labelled_by: String,
    pub has_popup: &'static str,
    pub expanded: bool,
    pub display_text: String,
    /// Whether `display_text` is the placeholder.
    pub is_placeholder: bool,
}

/// Props for the floating panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelProps {
    pub id: String,
    /// `None` until trigger and panel geometry are known.
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProps {
    pub id: String,
    pub query: String,
}

/// Props for the option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBoxProps {
    pub id: String,
    pub labelled_by: String,
    /// Element id of the keyboard-focused option.
    pub active_descendant: Option<String>,
    /// Matched option ids in display order.
    pub option_ids: Vec<String>,
}

/// Props for one option row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionProps {
    pub id: String,
    pub element_id: String,
    pub text: String,
    pub selected: bool,
    pub focused: bool,
    /// Query matches inside `text`, for highlighting.
    pub spans: Vec<MatchSpan>,
}

impl SelectController {
    /// Props for the trigger. Available in any state.
    pub fn trigger_props(&self) -> TriggerProps {
        let ids = self.element_ids();
        let selected = self
            .value()
            .display_text(self.registry(), self.display_separator());
        let is_placeholder = selected.is_none();

        TriggerProps {
            id: ids.trigger(),
            labelled_by: ids.label(),
            has_popup: POPUP_KIND,
            expanded: self.is_open(),
            display_text: selected.unwrap_or_else(|| self.placeholder().to_string()),
            is_placeholder,
        }
    }

    pub fn panel_props(&self) -> SelectResult<PanelProps> {
        self.require_open("panel_props")?;
        Ok(PanelProps {
            id: self.element_ids().dropdown(),
            placement: self.placement().cloned(),
        })
    }

    pub fn search_props(&self) -> SelectResult<SearchProps> {
        self.require_open("search_props")?;
        Ok(SearchProps {
            id: self.element_ids().search(),
            query: self.query().to_string(),
        })
    }

    pub fn list_box_props(&self) -> SelectResult<ListBoxProps> {
        self.require_open("list_box_props")?;
        let ids = self.element_ids();
        Ok(ListBoxProps {
            id: ids.listbox(),
            labelled_by: ids.label(),
            active_descendant: self.cursor().map(|id| ids.option(id)),
            option_ids: self.filter_state().matched_ids().to_vec(),
        })
    }

    /// Props for option `id`.
    ///
    /// Ids outside the registry get empty text; the host declared them, so
    /// they still render.
    pub fn option_props(&self, id: &str) -> SelectResult<OptionProps> {
        self.require_open("option_props")?;
        Ok(OptionProps {
            id: id.to_string(),
            element_id: self.element_ids().option(id),
            text: self.registry().text(id).unwrap_or_default().to_string(),
            selected: self.value().is_selected(id),
            focused: self.cursor() == Some(id),
            spans: self.filter_state().spans(id).to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::OptionDecl;
    use crate::selection::SelectionValue;

    fn select(value: SelectionValue) -> SelectController {
        SelectController::new(value)
            .with_base_id("pet")
            .with_placeholder("Pick a pet")
            .with_options([
                OptionDecl::text("cat", "Cat"),
                OptionDecl::text("dog", "Dog"),
                OptionDecl::text("caracal", "Caracal"),
            ])
    }

    #[test]
    fn test_trigger_placeholder() {
        let select = select(SelectionValue::Multiple(None));
        let props = select.trigger_props();
        assert_eq!(props.id, "pet-trigger");
        assert_eq!(props.labelled_by, "pet-label");
        assert_eq!(props.has_popup, "listbox");
        assert!(!props.expanded);
        assert!(props.is_placeholder);
        assert_eq!(props.display_text, "Pick a pet");
    }

    #[test]
    fn test_trigger_display_skips_stale_ids() {
        let select = select(SelectionValue::multiple(["dog", "gone", "cat"]));
        let props = select.trigger_props();
        assert!(!props.is_placeholder);
        assert_eq!(props.display_text, "Dog, Cat");
    }

    #[test]
    fn test_session_props_require_open() {
        let select = select(SelectionValue::Single(None));
        assert!(select.panel_props().unwrap_err().is_missing_context());
        assert!(select.search_props().unwrap_err().is_missing_context());
        assert!(select.list_box_props().unwrap_err().is_missing_context());
        assert!(select.option_props("cat").unwrap_err().is_missing_context());
    }

    #[test]
    fn test_list_box_and_option_props() {
        let mut select = select(SelectionValue::single("caracal"));
        select.open();
        select.set_query("ca").unwrap();
        select.option_pointer_over("caracal").unwrap();

        let list = select.list_box_props().unwrap();
        assert_eq!(list.id, "pet-listbox");
        assert_eq!(list.option_ids, vec!["cat", "caracal"]);
        assert_eq!(list.active_descendant.as_deref(), Some("pet-option-caracal"));

        let option = select.option_props("caracal").unwrap();
        assert!(option.selected);
        assert!(option.focused);
        assert_eq!(option.element_id, "pet-option-caracal");
        assert_eq!(option.spans, vec![MatchSpan::new(0, 2), MatchSpan::new(4, 2)]);

        assert_eq!(select.search_props().unwrap().query, "ca");
        assert_eq!(select.panel_props().unwrap().id, "pet-dropdown");
        assert!(select.trigger_props().expanded);
    }
}
