//! View host abstraction.
//!
//! The engine never owns views. It keeps [`ViewId`] handles for the mounted
//! trigger, panel and search surface and asks the host about containment,
//! geometry and focus through [`ViewHost`].
//!
//! [`ViewTree`] is an in-memory host used by tests, the demo and headless
//! hosts that do their own rendering.

use std::fmt::Write as _;
use std::sync::Arc;

use horizon_select_core::Rect;
use horizon_select_core::logging::targets;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle for a view owned by the host.
    pub struct ViewId;
}

/// The parts of a select the presentation layer mounts as views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewRole {
    Trigger,
    Panel,
    Search,
}

/// Queries the engine makes against the host's view hierarchy.
pub trait ViewHost {
    /// Whether `target` is `ancestor` or lies inside its subtree.
    fn contains(&self, ancestor: ViewId, target: ViewId) -> bool;

    /// Current bounds of `view`, if it is mounted and laid out.
    fn geometry(&self, view: ViewId) -> Option<Rect>;

    /// Move keyboard focus to `view`. Returns `false` if it cannot take focus.
    fn request_focus(&mut self, view: ViewId) -> bool;

    /// Whether the focused view is `view` or inside its subtree.
    fn focus_within(&self, view: ViewId) -> bool;
}

#[derive(Debug, Clone)]
struct ViewNode {
    name: String,
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    geometry: Option<Rect>,
    focusable: bool,
}

/// An in-memory view hierarchy.
#[derive(Debug, Default)]
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewNode>,
    focused: Option<ViewId>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a focusable view under `parent` (or as a root).
    pub fn insert(&mut self, name: impl Into<String>, parent: Option<ViewId>) -> ViewId {
        let id = self.nodes.insert(ViewNode {
            name: name.into(),
            parent,
            children: Vec::new(),
            geometry: None,
            focusable: true,
        });
        if let Some(node) = parent.and_then(|parent| self.nodes.get_mut(parent)) {
            node.children.push(id);
        }
        id
    }

    /// Remove `view` and its subtree. Focus inside the subtree is dropped.
    pub fn remove(&mut self, view: ViewId) -> bool {
        if self.focused.is_some_and(|focused| self.contains(view, focused)) {
            self.focused = None;
        }
        let Some(node) = self.nodes.remove(view) else {
            return false;
        };
        if let Some(parent) = node.parent.and_then(|parent| self.nodes.get_mut(parent)) {
            parent.children.retain(|child| *child != view);
        }
        for child in node.children {
            self.remove(child);
        }
        true
    }

    pub fn exists(&self, view: ViewId) -> bool {
        self.nodes.contains_key(view)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.nodes.get(view).and_then(|node| node.parent)
    }

    pub fn set_geometry(&mut self, view: ViewId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(view) {
            node.geometry = Some(rect);
        }
    }

    pub fn set_focusable(&mut self, view: ViewId, focusable: bool) {
        if let Some(node) = self.nodes.get_mut(view) {
            node.focusable = focusable;
        }
    }

    pub fn focused(&self) -> Option<ViewId> {
        self.focused
    }

    /// Move focus as the user would (click, Tab). `None` blurs everything.
    pub fn set_focus(&mut self, view: Option<ViewId>) {
        self.focused = view.filter(|view| self.nodes.contains_key(*view));
    }

    /// Render the hierarchy as an indented tree, one view per line.
    pub fn format_tree(&self) -> String {
        let mut output = String::new();
        let roots = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id);
        for root in roots {
            self.format_subtree_into(root, "", true, true, &mut output);
        }
        output
    }

    fn format_subtree_into(
        &self,
        id: ViewId,
        prefix: &str,
        is_last: bool,
        is_root: bool,
        output: &mut String,
    ) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let branch = match (is_root, is_last) {
            (true, _) => "",
            (false, true) => "└── ",
            (false, false) => "├── ",
        };
        let _ = write!(output, "{prefix}{branch}{}", node.name);
        if let Some(rect) = node.geometry {
            let _ = write!(
                output,
                " ({}, {}) {}x{}",
                rect.left(),
                rect.top(),
                rect.width(),
                rect.height()
            );
        }
        if self.focused == Some(id) {
            output.push_str(" *");
        }
        output.push('\n');

        let child_prefix = match (is_root, is_last) {
            (true, _) => prefix.to_string(),
            (false, true) => format!("{prefix}    "),
            (false, false) => format!("{prefix}│   "),
        };
        let count = node.children.len();
        for (index, child) in node.children.iter().enumerate() {
            self.format_subtree_into(*child, &child_prefix, index + 1 == count, false, output);
        }
    }
}

impl ViewHost for ViewTree {
    fn contains(&self, ancestor: ViewId, target: ViewId) -> bool {
        let mut current = Some(target);
        while let Some(view) = current {
            if view == ancestor {
                return self.nodes.contains_key(view);
            }
            current = self.parent(view);
        }
        false
    }

    fn geometry(&self, view: ViewId) -> Option<Rect> {
        self.nodes.get(view).and_then(|node| node.geometry)
    }

    fn request_focus(&mut self, view: ViewId) -> bool {
        match self.nodes.get(view) {
            Some(node) if node.focusable => {
                self.focused = Some(view);
                tracing::trace!(target: targets::VIEW, view = %node.name, "focus moved");
                true
            }
            _ => false,
        }
    }

    fn focus_within(&self, view: ViewId) -> bool {
        self.focused
            .is_some_and(|focused| self.contains(view, focused))
    }
}

/// A [`ViewTree`] shared between the host and a controller.
#[derive(Debug, Clone, Default)]
pub struct SharedViewTree {
    inner: Arc<RwLock<ViewTree>>,
}

impl SharedViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ViewTree> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ViewTree> {
        self.inner.write()
    }
}

impl From<ViewTree> for SharedViewTree {
    fn from(tree: ViewTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }
}

impl ViewHost for SharedViewTree {
    fn contains(&self, ancestor: ViewId, target: ViewId) -> bool {
        self.inner.read().contains(ancestor, target)
    }

    fn geometry(&self, view: ViewId) -> Option<Rect> {
        self.inner.read().geometry(view)
    }

    fn request_focus(&mut self, view: ViewId) -> bool {
        self.inner.write().request_focus(view)
    }

    fn focus_within(&self, view: ViewId) -> bool {
        self.inner.read().focus_within(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ViewTree, ViewId, ViewId, ViewId, ViewId) {
        let mut tree = ViewTree::new();
        let window = tree.insert("window", None);
        let panel = tree.insert("panel", Some(window));
        let search = tree.insert("search", Some(panel));
        let other = tree.insert("other", Some(window));
        (tree, window, panel, search, other)
    }

    #[test]
    fn test_contains() {
        let (tree, window, panel, search, other) = sample();
        assert!(tree.contains(panel, panel));
        assert!(tree.contains(panel, search));
        assert!(tree.contains(window, search));
        assert!(!tree.contains(panel, other));
        assert!(!tree.contains(search, panel));
    }

    #[test]
    fn test_focus_within() {
        let (mut tree, _, panel, search, other) = sample();
        assert!(tree.request_focus(search));
        assert!(tree.focus_within(panel));

        tree.set_focus(Some(other));
        assert!(!tree.focus_within(panel));

        tree.set_focusable(other, false);
        assert!(!tree.request_focus(other));
    }

    #[test]
    fn test_remove_subtree_drops_focus() {
        let (mut tree, window, panel, search, _) = sample();
        tree.set_focus(Some(search));
        assert!(tree.remove(panel));
        assert!(!tree.exists(search));
        assert_eq!(tree.focused(), None);
        assert!(!tree.contains(window, search));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_geometry() {
        let (mut tree, _, panel, _, _) = sample();
        assert_eq!(tree.geometry(panel), None);
        tree.set_geometry(panel, Rect::new(0.0, 30.0, 120.0, 200.0));
        assert_eq!(tree.geometry(panel), Some(Rect::new(0.0, 30.0, 120.0, 200.0)));
    }

    #[test]
    fn test_format_tree() {
        let (mut tree, _, _, search, _) = sample();
        tree.set_focus(Some(search));
        let output = tree.format_tree();
        assert_eq!(
            output,
            "window\n├── panel\n│   └── search *\n└── other\n"
        );
    }

    #[test]
    fn test_shared_tree() {
        let shared = SharedViewTree::new();
        let root = shared.write().insert("root", None);
        let mut host = shared.clone();
        assert!(host.request_focus(root));
        assert_eq!(shared.read().focused(), Some(root));
    }
}
