//! Shared host fixture for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use horizon_select::{
    ListenerRegistry, OptionDecl, Rect, SelectController, SelectionValue, SharedViewTree,
    ViewId, ViewRole, ViewTree,
};
use parking_lot::Mutex;

/// A host with a window containing a trigger, a panel with a search field and
/// an unrelated button.
pub struct Host {
    pub select: SelectController,
    pub tree: SharedViewTree,
    pub listeners: ListenerRegistry,
    pub trigger: ViewId,
    pub panel: ViewId,
    pub search: ViewId,
    pub elsewhere: ViewId,
    committed: Arc<Mutex<Vec<SelectionValue>>>,
}

pub fn options(pairs: &[(&str, &str)]) -> Vec<OptionDecl> {
    pairs
        .iter()
        .map(|(id, text)| OptionDecl::text(*id, *text))
        .collect()
}

pub fn animals() -> Vec<OptionDecl> {
    options(&[
        ("cat", "Cat"),
        ("dog", "Dog"),
        ("cow", "Cow"),
        ("caracal", "Caracal"),
    ])
}

impl Host {
    pub fn new(value: SelectionValue) -> Self {
        Self::with_listeners(value, ListenerRegistry::new())
    }

    pub fn with_listeners(value: SelectionValue, listeners: ListenerRegistry) -> Self {
        let mut tree = ViewTree::new();
        let window = tree.insert("window", None);
        let trigger = tree.insert("trigger", Some(window));
        let panel = tree.insert("panel", Some(window));
        let search = tree.insert("search", Some(panel));
        let elsewhere = tree.insert("elsewhere", Some(window));
        tree.set_geometry(window, Rect::new(0.0, 0.0, 800.0, 600.0));
        tree.set_geometry(trigger, Rect::new(20.0, 20.0, 160.0, 28.0));
        tree.set_geometry(panel, Rect::new(0.0, 0.0, 160.0, 200.0));
        tree.set_focus(Some(trigger));
        let tree = SharedViewTree::from(tree);

        let select = SelectController::new(value)
            .with_options(animals())
            .with_view_host(tree.clone())
            .with_input_source(listeners.clone());

        let committed = Arc::new(Mutex::new(Vec::new()));
        let committed_clone = committed.clone();
        select.selection_changed.connect(move |value: &SelectionValue| {
            committed_clone.lock().push(value.clone());
        });

        let mut host = Self {
            select,
            tree,
            listeners,
            trigger,
            panel,
            search,
            elsewhere,
            committed,
        };
        host.select.view_mounted(ViewRole::Trigger, trigger);
        host
    }

    /// Open and mount the panel, without a search field.
    pub fn open(&mut self) {
        self.select.open();
        self.select.view_mounted(ViewRole::Panel, self.panel);
    }

    /// Open and mount the panel and its search field.
    pub fn open_with_search(&mut self) {
        self.open();
        self.select.view_mounted(ViewRole::Search, self.search);
    }

    /// Feed every emitted selection back, as a controlled host would.
    pub fn sync_value(&mut self) {
        let pending: Vec<_> = self.committed.lock().drain(..).collect();
        for value in pending {
            self.select
                .set_value(value)
                .expect("emitted value has the controller's mode");
        }
    }

    pub fn emitted(&self) -> Vec<SelectionValue> {
        self.committed.lock().clone()
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.tree.read().focused()
    }
}
