//! Key input and dismissal listener subscriptions.
//!
//! While a select is open it needs to hear about pointer presses, key presses
//! and focus moves anywhere in the host, not just on its own views. The host
//! provides an [`InputSource`] that turns those global subscriptions on and
//! off; the controller attaches listeners when a session opens and detaches
//! them when it closes or is dropped.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use horizon_select_core::logging::targets;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use crate::error::AttachError;

/// Keys the select engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Backspace,
    Tab,
    /// Any printable character other than space.
    Character(char),
}

impl Key {
    /// Map a printable character to a key.
    pub fn from_char(ch: char) -> Self {
        match ch {
            ' ' => Key::Space,
            ch => Key::Character(ch),
        }
    }

    /// Whether this key produces text when typed into a search field.
    pub fn is_text_input(&self) -> bool {
        matches!(self, Key::Space | Key::Character(_) | Key::Backspace)
    }
}

/// The global subscriptions a select holds while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListenerKind {
    /// Pointer presses anywhere, for outside-click dismissal.
    PointerDown,
    /// Key presses, for Escape dismissal and list navigation.
    KeyDown,
    /// Focus moves, for focus-loss dismissal.
    FocusChange,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 3] = [
        ListenerKind::PointerDown,
        ListenerKind::KeyDown,
        ListenerKind::FocusChange,
    ];
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerKind::PointerDown => f.write_str("pointer-down"),
            ListenerKind::KeyDown => f.write_str("key-down"),
            ListenerKind::FocusChange => f.write_str("focus-change"),
        }
    }
}

new_key_type! {
    /// Handle for one attached listener.
    pub struct ListenerId;
}

/// A source of global input subscriptions.
pub trait InputSource {
    /// Start delivering events of `kind` to the select.
    fn attach(&mut self, kind: ListenerKind) -> Result<ListenerId, AttachError>;

    /// Stop delivering events for `id`. Returns `false` for an unknown id.
    fn detach(&mut self, id: ListenerId) -> bool;
}

#[derive(Debug, Default)]
struct ListenerTable {
    active: SlotMap<ListenerId, ListenerKind>,
    unsupported: HashSet<ListenerKind>,
    total_attached: usize,
}

/// Shared in-memory [`InputSource`].
///
/// Clones share the same table, so a host can hand one clone to a controller
/// and keep another to decide which global events to forward. Kinds can be
/// marked unsupported to model hosts without that capability.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Arc<Mutex<ListenerTable>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that refuses to attach `kind`.
    pub fn with_unsupported(kind: ListenerKind) -> Self {
        let registry = Self::new();
        registry.set_supported(kind, false);
        registry
    }

    pub fn set_supported(&self, kind: ListenerKind, supported: bool) {
        let mut inner = self.inner.lock();
        if supported {
            inner.unsupported.remove(&kind);
        } else {
            inner.unsupported.insert(kind);
        }
    }

    /// Number of listeners currently attached.
    pub fn active_count(&self) -> usize {
        self.inner.lock().active.len()
    }

    /// Whether any listener of `kind` is attached.
    pub fn is_active(&self, kind: ListenerKind) -> bool {
        self.inner.lock().active.values().any(|active| *active == kind)
    }

    /// Number of successful attaches over the registry's lifetime.
    pub fn total_attached(&self) -> usize {
        self.inner.lock().total_attached
    }
}

impl InputSource for ListenerRegistry {
    fn attach(&mut self, kind: ListenerKind) -> Result<ListenerId, AttachError> {
        let mut inner = self.inner.lock();
        if inner.unsupported.contains(&kind) {
            return Err(AttachError::new(kind, "not supported by this host"));
        }
        let id = inner.active.insert(kind);
        inner.total_attached += 1;
        tracing::trace!(target: targets::INPUT, %kind, active = inner.active.len(), "listener attached");
        Ok(id)
    }

    fn detach(&mut self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.active.remove(id);
        if let Some(kind) = removed {
            tracing::trace!(target: targets::INPUT, %kind, active = inner.active.len(), "listener detached");
        }
        removed.is_some()
    }
}
