//! The select controller.
//!
//! [`SelectController`] is the single entry point for user intents. It owns
//! the option registry, the search filter, the focus cursor and the
//! open/closed lifecycle, and it reads (but never writes) the caller-owned
//! selection value.
//!
//! # State machine
//!
//! ```text
//!         open / toggle / ArrowDown, Enter, Space on trigger
//!   Closed ─────────────────────────────────────────▶ Open
//!     ▲                                                 │
//!     └─────────────────────────────────────────────────┘
//!      toggle, single commit, outside press, Escape,
//!      focus loss, close(), dispose
//! ```
//!
//! Entering `Open` resets the query, attaches dismissal listeners, tries to
//! focus the search surface (or the panel) and computes placement. Leaving it
//! detaches the listeners and resets the query, cursor and placement.
//!
//! # Controlled selection
//!
//! Committing an option emits [`selection_changed`](SelectController::selection_changed)
//! with the new value. The controller keeps reading the old value until the
//! caller feeds the committed one back with [`set_value`](SelectController::set_value).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use horizon_select::{OptionDecl, SelectController, SelectionValue};
//!
//! let mut select = SelectController::new(SelectionValue::Single(None))
//!     .with_options([OptionDecl::text("cat", "Cat"), OptionDecl::text("dog", "Dog")]);
//!
//! let committed = Arc::new(Mutex::new(None));
//! let committed_clone = committed.clone();
//! select.selection_changed.connect(move |value| {
//!     *committed_clone.lock() = Some(value.clone());
//! });
//!
//! select.open();
//! select.option_activate("dog").unwrap();
//!
//! assert!(!select.is_open());
//! assert_eq!(*committed.lock(), Some(SelectionValue::single("dog")));
//! ```

use std::fmt;

use horizon_select_core::Signal;
use horizon_select_core::logging::{span_names, targets};

use crate::config::{DEFAULT_DISPLAY_SEPARATOR, DEFAULT_FOCUS_RETRY_WINDOW, SelectConfig};
use crate::dismiss::{DismissFlags, DismissReason};
use crate::error::{SelectError, SelectResult};
use crate::filter::{self, FilterState};
use crate::focus::{self, Direction};
use crate::ids::ElementIds;
use crate::input::{InputSource, Key, ListenerId, ListenerKind, ListenerRegistry};
use crate::intent::SelectIntent;
use crate::placement::{AnchoredPlacement, Placement, PositioningCoordinator};
use crate::registry::{OptionDecl, OptionRegistry};
use crate::selection::{SelectionMode, SelectionValue};
use crate::snapshot::{OptionState, SelectSnapshot};
use crate::view::{SharedViewTree, ViewHost, ViewId, ViewRole};

/// Whether the panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpenState {
    #[default]
    Closed,
    Open,
}

impl OpenState {
    pub fn is_open(&self) -> bool {
        matches!(self, OpenState::Open)
    }
}

impl fmt::Display for OpenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenState::Closed => f.write_str("closed"),
            OpenState::Open => f.write_str("open"),
        }
    }
}

// ============================================================================
// Session bookkeeping
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
struct MountedViews {
    trigger: Option<ViewId>,
    panel: Option<ViewId>,
    search: Option<ViewId>,
}

impl MountedViews {
    fn get(&self, role: ViewRole) -> Option<ViewId> {
        match role {
            ViewRole::Trigger => self.trigger,
            ViewRole::Panel => self.panel,
            ViewRole::Search => self.search,
        }
    }

    fn set(&mut self, role: ViewRole, view: Option<ViewId>) {
        match role {
            ViewRole::Trigger => self.trigger = view,
            ViewRole::Panel => self.panel = view,
            ViewRole::Search => self.search = view,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct DismissalListeners {
    pointer: Option<ListenerId>,
    key: Option<ListenerId>,
    focus: Option<ListenerId>,
}

impl DismissalListeners {
    fn ids(&self) -> impl Iterator<Item = ListenerId> {
        [self.pointer, self.key, self.focus].into_iter().flatten()
    }
}

/// Focus that should land once the panel's views mount.
#[derive(Debug, Clone, Copy)]
struct PendingFocus {
    /// Where focus landed so far. Panel focus may still move to the search.
    landed: Option<ViewRole>,
    retries_left: u32,
}

#[derive(Debug)]
struct OpenSession {
    id: u64,
    /// Dismissal triggers in force for this session.
    dismiss: DismissFlags,
    listeners: DismissalListeners,
    pending_focus: Option<PendingFocus>,
}

// ============================================================================
// SelectController
// ============================================================================

/// Headless select/combobox controller.
///
/// # Signals
///
/// - `selection_changed(SelectionValue)`: a commit or removal produced a new value
/// - `open_changed(OpenState)`: the panel opened or closed
/// - `query_changed(String)`: the search query changed
/// - `cursor_changed(Option<String>)`: the keyboard-focused option changed
/// - `placement_changed(Option<Placement>)`: the panel placement changed
/// - `dismissed(DismissReason)`: an open session ended, and why
pub struct SelectController {
    ids: ElementIds,
    registry: OptionRegistry,
    filter: FilterState,
    cursor: Option<String>,
    value: SelectionValue,
    open: OpenState,
    placeholder: String,
    display_separator: String,
    commit_keys: Vec<Key>,
    dismiss: DismissFlags,
    focus_retry_window: u32,
    views: MountedViews,
    session: Option<OpenSession>,
    sessions_started: u64,
    placement: Option<Placement>,
    input: Box<dyn InputSource>,
    host: Box<dyn ViewHost>,
    positioner: Box<dyn PositioningCoordinator>,

    /// Emitted with the requested new value after a commit or removal.
    pub selection_changed: Signal<SelectionValue>,
    /// Emitted after every open/close transition.
    pub open_changed: Signal<OpenState>,
    /// Emitted when the search query changes.
    pub query_changed: Signal<String>,
    /// Emitted when the focus cursor moves or resets.
    pub cursor_changed: Signal<Option<String>>,
    /// Emitted when the panel placement changes.
    pub placement_changed: Signal<Option<Placement>>,
    /// Emitted when an open session ends.
    pub dismissed: Signal<DismissReason>,
}

impl SelectController {
    /// Create a controller whose mode follows `value`.
    ///
    /// It starts with no options, an in-memory listener registry, an
    /// in-memory view tree and the default anchored placement.
    pub fn new(value: SelectionValue) -> Self {
        Self {
            ids: ElementIds::generate(),
            registry: OptionRegistry::new(),
            filter: FilterState::default(),
            cursor: None,
            value,
            open: OpenState::Closed,
            placeholder: String::new(),
            display_separator: DEFAULT_DISPLAY_SEPARATOR.to_string(),
            commit_keys: vec![Key::Enter, Key::Space],
            dismiss: DismissFlags::DEFAULT,
            focus_retry_window: DEFAULT_FOCUS_RETRY_WINDOW,
            views: MountedViews::default(),
            session: None,
            sessions_started: 0,
            placement: None,
            input: Box::new(ListenerRegistry::new()),
            host: Box::new(SharedViewTree::new()),
            positioner: Box::new(AnchoredPlacement::default()),
            selection_changed: Signal::new(),
            open_changed: Signal::new(),
            query_changed: Signal::new(),
            cursor_changed: Signal::new(),
            placement_changed: Signal::new(),
            dismissed: Signal::new(),
        }
    }

    /// Create a controller from a configuration, starting with an untouched
    /// value of the configured mode.
    pub fn from_config(config: SelectConfig) -> Self {
        let positioner = config.anchored_placement();
        let SelectConfig {
            base_id,
            placeholder,
            mode,
            commit_keys,
            focus_retry_window,
            display_separator,
            dismiss,
            options,
            ..
        } = config;

        let mut controller = Self::new(SelectionValue::empty(mode))
            .with_placeholder(placeholder)
            .with_commit_keys(commit_keys)
            .with_dismiss_flags(dismiss.flags())
            .with_focus_retry_window(focus_retry_window)
            .with_positioner(positioner)
            .with_options(options);
        controller.display_separator = display_separator;
        if let Some(base_id) = base_id {
            controller.ids = ElementIds::new(base_id);
        }
        controller
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_options(mut self, options: impl IntoIterator<Item = OptionDecl>) -> Self {
        self.set_options(options);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_base_id(mut self, base_id: impl Into<String>) -> Self {
        self.ids = ElementIds::new(base_id);
        self
    }

    pub fn with_commit_keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.commit_keys = keys.into_iter().collect();
        self
    }

    pub fn with_dismiss_flags(mut self, flags: DismissFlags) -> Self {
        self.dismiss = flags;
        self
    }

    pub fn with_focus_retry_window(mut self, window: u32) -> Self {
        self.focus_retry_window = window;
        self
    }

    pub fn with_input_source(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_view_host(mut self, host: impl ViewHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    pub fn with_positioner(mut self, positioner: impl PositioningCoordinator + 'static) -> Self {
        self.positioner = Box::new(positioner);
        self
    }

    // =========================================================================
    // State Access
    // =========================================================================

    pub fn mode(&self) -> SelectionMode {
        self.value.mode()
    }

    /// The last value fed back by the caller.
    pub fn value(&self) -> &SelectionValue {
        &self.value
    }

    pub fn open_state(&self) -> OpenState {
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_open()
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn query(&self) -> &str {
        self.filter.query()
    }

    /// The keyboard-focused option, always one of the matched ids.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Joins selected option texts on the trigger.
    pub fn display_separator(&self) -> &str {
        &self.display_separator
    }

    pub fn element_ids(&self) -> &ElementIds {
        &self.ids
    }

    pub fn dismiss_flags(&self) -> DismissFlags {
        self.dismiss
    }

    /// The view currently registered for `role`.
    pub fn mounted_view(&self, role: ViewRole) -> Option<ViewId> {
        self.views.get(role)
    }

    /// Number of sessions opened so far.
    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// Whether a dismissal listener of `kind` is attached for the current
    /// session.
    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.session.as_ref().is_some_and(|session| match kind {
            ListenerKind::PointerDown => session.listeners.pointer.is_some(),
            ListenerKind::KeyDown => session.listeners.key.is_some(),
            ListenerKind::FocusChange => session.listeners.focus.is_some(),
        })
    }

    /// Whether the open session is still waiting for a view to take focus.
    pub fn is_focus_pending(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.pending_focus.is_some())
    }

    /// Selected option texts joined for the trigger, or the placeholder.
    pub fn display_text(&self) -> String {
        self.value
            .display_text(&self.registry, &self.display_separator)
            .unwrap_or_else(|| self.placeholder.clone())
    }

    /// Copy out the full render state.
    pub fn snapshot(&self) -> SelectSnapshot {
        let options = self
            .filter
            .matched_ids()
            .iter()
            .filter_map(|id| self.registry.get(id))
            .map(|option| OptionState {
                id: option.id.clone(),
                text: option.text.clone(),
                is_focused: self.cursor.as_deref() == Some(option.id.as_str()),
                is_selected: self.value.is_selected(&option.id),
                spans: self.filter.spans(&option.id).to_vec(),
            })
            .collect();

        SelectSnapshot {
            open: self.open,
            selection_value: self.value.clone(),
            filter_state: self.filter.clone(),
            focus_cursor: self.cursor.clone(),
            placeholder_text: self.placeholder.clone(),
            display_text: self.display_text(),
            placement: self.placement.clone(),
            options,
        }
    }

    // =========================================================================
    // Caller-Owned Inputs
    // =========================================================================

    /// Feed back the committed selection value.
    pub fn set_value(&mut self, value: SelectionValue) -> SelectResult<()> {
        if value.mode() != self.mode() {
            return Err(SelectError::ModeMismatch {
                expected: self.mode(),
                found: value.mode(),
            });
        }
        if value != self.value {
            tracing::debug!(target: targets::CONTROLLER, value = ?value, "selection value updated");
            self.value = value;
        }
        Ok(())
    }

    /// Replace the declared options.
    ///
    /// The filter is re-run with the current query and the cursor revalidated
    /// before this returns.
    pub fn set_options(&mut self, options: impl IntoIterator<Item = OptionDecl>) {
        self.registry = OptionRegistry::build(options);
        self.refilter();
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Change the dismissal triggers. Takes effect from the next session.
    pub fn set_dismiss_flags(&mut self, flags: DismissFlags) {
        self.dismiss = flags;
    }

    /// Change how many mount notifications retry the open focus. Takes
    /// effect from the next session.
    pub fn set_focus_retry_window(&mut self, window: u32) {
        self.focus_retry_window = window;
    }

    // =========================================================================
    // Open / Close
    // =========================================================================

    /// Open when closed, close when open. Returns `true` on a transition.
    pub fn open_toggle(&mut self) -> bool {
        if self.is_open() {
            self.close_with(DismissReason::TriggerToggle)
        } else {
            self.open()
        }
    }

    /// Open the panel. Returns `false` if it was already open.
    pub fn open(&mut self) -> bool {
        if self.is_open() {
            return false;
        }

        self.sessions_started += 1;
        let session_id = self.sessions_started;
        let _span = tracing::debug_span!(
            target: targets::CONTROLLER,
            span_names::SESSION,
            session = session_id
        )
        .entered();

        self.open = OpenState::Open;
        self.filter = FilterState::unfiltered(&self.registry);
        self.cursor = None;

        let listeners = self.attach_listeners();
        self.session = Some(OpenSession {
            id: session_id,
            dismiss: self.dismiss,
            listeners,
            pending_focus: Some(PendingFocus {
                landed: None,
                retries_left: self.focus_retry_window,
            }),
        });

        self.attempt_open_focus();
        self.recompute_placement();

        tracing::debug!(target: targets::CONTROLLER, session = session_id, "select opened");
        self.open_changed.emit(OpenState::Open);
        true
    }

    /// Close the panel. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        self.close_with(DismissReason::Programmatic)
    }

    fn close_with(&mut self, reason: DismissReason) -> bool {
        if !self.is_open() {
            return false;
        }

        let session = self.session.take();
        if let Some(session) = &session {
            self.detach_listeners(session.listeners);
        }

        // Hand focus back to the trigger if it was inside the panel.
        if self.focus_within(ViewRole::Panel) || self.focus_within(ViewRole::Search) {
            if let Some(trigger) = self.views.trigger {
                self.host.request_focus(trigger);
            }
        }

        self.open = OpenState::Closed;
        let had_query = !self.filter.query().is_empty();
        self.filter = FilterState::unfiltered(&self.registry);
        let had_cursor = self.cursor.take().is_some();
        let had_placement = self.placement.take().is_some();
        self.views.panel = None;
        self.views.search = None;

        tracing::debug!(
            target: targets::CONTROLLER,
            session = session.as_ref().map(|session| session.id),
            %reason,
            "select closed"
        );

        if had_query {
            self.query_changed.emit(String::new());
        }
        if had_cursor {
            self.cursor_changed.emit(None);
        }
        if had_placement {
            self.placement_changed.emit(None);
        }
        self.open_changed.emit(OpenState::Closed);
        self.dismissed.emit(reason);
        true
    }

    /// End the current session and release its listeners.
    ///
    /// Also runs on drop.
    pub fn dispose(&mut self) {
        self.close_with(DismissReason::Disposed);
    }

    fn attach_listeners(&mut self) -> DismissalListeners {
        let mut listeners = DismissalListeners::default();
        if self.dismiss.close_on_outside_pointer() {
            listeners.pointer = self.attach(ListenerKind::PointerDown);
        }
        listeners.key = self.attach(ListenerKind::KeyDown);
        if self.dismiss.close_on_focus_loss() {
            listeners.focus = self.attach(ListenerKind::FocusChange);
        }
        listeners
    }

    fn attach(&mut self, kind: ListenerKind) -> Option<ListenerId> {
        match self.input.attach(kind) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(
                    target: targets::INPUT,
                    error = %err,
                    "dismissal listener unavailable for this session"
                );
                None
            }
        }
    }

    fn detach_listeners(&mut self, listeners: DismissalListeners) {
        for id in listeners.ids() {
            if !self.input.detach(id) {
                tracing::warn!(target: targets::INPUT, "listener was already detached");
            }
        }
    }

    // =========================================================================
    // Dismissal Input
    // =========================================================================

    /// A pointer press landed on `target` (`None`: outside every known view).
    ///
    /// Closes the panel when the press is outside both panel and trigger; the
    /// trigger's own toggle handles presses on the trigger.
    pub fn pointer_down_outside(&mut self, target: Option<ViewId>) -> bool {
        if !self.has_listener(ListenerKind::PointerDown) {
            return false;
        }
        if target.is_some_and(|target| self.is_inside_select(target)) {
            return false;
        }
        self.close_with(DismissReason::OutsidePointer)
    }

    /// Keyboard focus moved to `target` (`None`: nothing is focused).
    pub fn focus_moved(&mut self, target: Option<ViewId>) -> bool {
        if !self.has_listener(ListenerKind::FocusChange) {
            return false;
        }
        if target.is_some_and(|target| self.is_inside_select(target)) {
            return false;
        }
        self.close_with(DismissReason::FocusLoss)
    }

    fn is_inside_select(&self, target: ViewId) -> bool {
        [ViewRole::Panel, ViewRole::Search, ViewRole::Trigger]
            .into_iter()
            .filter_map(|role| self.views.get(role))
            .any(|view| self.host.contains(view, target))
    }

    fn focus_within(&self, role: ViewRole) -> bool {
        self.views
            .get(role)
            .is_some_and(|view| self.host.focus_within(view))
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key press. Returns `true` if the key was consumed.
    ///
    /// Inside the open panel the arrow keys move the cursor, Home/End jump,
    /// commit keys activate the focused option and Escape closes. On the
    /// trigger, Backspace removes the last selection in multiple mode while
    /// the arrow keys, Enter and Space open a closed panel.
    pub fn key_input(&mut self, key: Key) -> bool {
        let in_panel =
            self.focus_within(ViewRole::Panel) || self.focus_within(ViewRole::Search);
        if self.is_open() && in_panel {
            return self.handle_panel_key(key);
        }
        if self.focus_within(ViewRole::Trigger) {
            return self.handle_trigger_key(key);
        }
        false
    }

    fn handle_panel_key(&mut self, key: Key) -> bool {
        if !self.has_listener(ListenerKind::KeyDown) {
            return false;
        }
        let typing = self.focus_within(ViewRole::Search);

        match key {
            Key::ArrowDown => self.move_cursor(Direction::Next),
            Key::ArrowUp => self.move_cursor(Direction::Previous),
            Key::Home if !typing => self.move_cursor(Direction::First),
            Key::End if !typing => self.move_cursor(Direction::Last),
            Key::Escape => {
                let honoured = self
                    .session
                    .as_ref()
                    .is_some_and(|session| session.dismiss.close_on_escape());
                honoured && self.close_with(DismissReason::Escape)
            }
            key if self.commit_keys.contains(&key) && !(typing && key.is_text_input()) => {
                self.activate_cursor()
            }
            _ => false,
        }
    }

    fn handle_trigger_key(&mut self, key: Key) -> bool {
        match key {
            Key::Backspace if self.mode() == SelectionMode::Multiple => self.remove_last(),
            Key::ArrowDown | Key::ArrowUp | Key::Enter | Key::Space if !self.is_open() => {
                self.open()
            }
            _ => false,
        }
    }

    fn move_cursor(&mut self, direction: Direction) -> bool {
        let next = focus::advance(direction, self.filter.matched_ids(), self.cursor.as_deref());
        self.set_cursor(next);
        true
    }

    fn activate_cursor(&mut self) -> bool {
        match self.cursor.clone() {
            Some(id) => {
                self.commit(&id);
                true
            }
            None => false,
        }
    }

    fn set_cursor(&mut self, cursor: Option<String>) -> bool {
        if self.cursor == cursor {
            return false;
        }
        tracing::trace!(target: targets::CONTROLLER, cursor = ?cursor, "cursor moved");
        self.cursor = cursor;
        self.cursor_changed.emit(self.cursor.clone());
        true
    }

    // =========================================================================
    // Options and Search
    // =========================================================================

    pub(crate) fn require_open(&self, operation: &'static str) -> SelectResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            tracing::warn!(target: targets::CONTROLLER, operation, "session-scoped call while closed");
            Err(SelectError::missing_context(operation))
        }
    }

    /// The pointer moved over option `id`. Only matched ids move the cursor.
    pub fn option_pointer_over(&mut self, id: &str) -> SelectResult<bool> {
        self.require_open("option_pointer_over")?;
        if !self.filter.is_matched(id) {
            return Ok(false);
        }
        Ok(self.set_cursor(Some(id.to_string())))
    }

    /// Option `id` was activated (clicked).
    ///
    /// Any id is accepted; ids outside the registry simply become stale
    /// entries of the value.
    pub fn option_activate(&mut self, id: &str) -> SelectResult<bool> {
        self.require_open("option_activate")?;
        self.commit(id);
        Ok(true)
    }

    fn commit(&mut self, id: &str) {
        let next = self.value.toggle(id);
        tracing::debug!(target: targets::CONTROLLER, id, value = ?next, "option committed");
        self.selection_changed.emit(next);
        if self.mode() == SelectionMode::Single {
            self.close_with(DismissReason::Commit);
        }
    }

    /// The search text changed. Re-filters and revalidates the cursor.
    pub fn set_query(&mut self, text: &str) -> SelectResult<bool> {
        self.require_open("set_query")?;
        Ok(self.apply_query(text))
    }

    /// Reset the search text. Valid in any state.
    pub fn clear_query(&mut self) -> bool {
        self.apply_query("")
    }

    fn apply_query(&mut self, text: &str) -> bool {
        if self.filter.query() == text {
            return false;
        }
        self.filter = filter::filter(&self.registry, text);
        let cursor = focus::revalidate(self.filter.matched_ids(), self.cursor.as_deref());
        self.set_cursor(cursor);
        self.query_changed.emit(text.to_string());
        true
    }

    fn refilter(&mut self) {
        let query = self.filter.query().to_string();
        self.filter = filter::filter(&self.registry, &query);
        let cursor = focus::revalidate(self.filter.matched_ids(), self.cursor.as_deref());
        self.set_cursor(cursor);
    }

    // =========================================================================
    // Selection Removal
    // =========================================================================

    /// Request removal of the last selected id (multiple mode).
    ///
    /// Emits `selection_changed` only when there was something to remove.
    pub fn remove_last(&mut self) -> bool {
        let next = self.value.remove_last();
        self.request_value(next)
    }

    /// Request removal of `id` from the selection (multiple mode).
    pub fn remove_selected(&mut self, id: &str) -> bool {
        let next = self.value.remove(id);
        self.request_value(next)
    }

    fn request_value(&mut self, next: SelectionValue) -> bool {
        if next == self.value {
            return false;
        }
        tracing::debug!(target: targets::CONTROLLER, value = ?next, "selection removal requested");
        self.selection_changed.emit(next);
        true
    }

    // =========================================================================
    // View Lifecycle
    // =========================================================================

    /// The presentation mounted `view` in `role`.
    pub fn view_mounted(&mut self, role: ViewRole, view: ViewId) {
        tracing::trace!(target: targets::VIEW, ?role, "view mounted");
        self.views.set(role, Some(view));
        if !self.is_open() {
            return;
        }
        if matches!(role, ViewRole::Panel | ViewRole::Search) {
            self.retry_open_focus();
        }
        if matches!(role, ViewRole::Trigger | ViewRole::Panel) {
            self.recompute_placement();
        }
    }

    /// The presentation unmounted the view in `role`.
    ///
    /// Unmounting the search surface clears the query.
    pub fn view_unmounted(&mut self, role: ViewRole) {
        tracing::trace!(target: targets::VIEW, ?role, "view unmounted");
        self.views.set(role, None);
        if role == ViewRole::Search {
            self.clear_query();
        }
        if self.is_open() && matches!(role, ViewRole::Trigger | ViewRole::Panel) {
            self.recompute_placement();
        }
    }

    /// Trigger or panel geometry changed.
    pub fn geometry_changed(&mut self) -> bool {
        self.is_open() && self.recompute_placement()
    }

    fn recompute_placement(&mut self) -> bool {
        let trigger = self.views.trigger.and_then(|view| self.host.geometry(view));
        let panel = self.views.panel.and_then(|view| self.host.geometry(view));
        let next = match (trigger, panel) {
            (Some(trigger), Some(panel)) if self.is_open() => {
                Some(self.positioner.compute_placement(trigger, panel))
            }
            (None, _) if self.is_open() => {
                tracing::debug!(target: targets::PLACEMENT, "trigger geometry unavailable, panel left unplaced");
                None
            }
            _ => None,
        };

        if next == self.placement {
            return false;
        }
        self.placement = next;
        self.placement_changed.emit(self.placement.clone());
        true
    }

    fn retry_open_focus(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(pending) = session.pending_focus.as_mut() else {
            return;
        };
        pending.retries_left = pending.retries_left.saturating_sub(1);
        let exhausted = pending.retries_left == 0;

        self.attempt_open_focus();

        if exhausted {
            if let Some(session) = self.session.as_mut() {
                if session.pending_focus.take().is_some() {
                    tracing::debug!(
                        target: targets::CONTROLLER,
                        session = session.id,
                        "open focus window elapsed"
                    );
                }
            }
        }
    }

    /// Focus the search surface, else the panel. Panel focus can still be
    /// upgraded to the search surface while the session's window is open.
    fn attempt_open_focus(&mut self) {
        let Some(pending) = self.session.as_ref().and_then(|session| session.pending_focus) else {
            return;
        };

        // Search is preferred; a search view that refuses focus falls back to
        // the panel so keyboard handling still reaches the session.
        let mut candidates = Vec::with_capacity(2);
        if let Some(search) = self.views.search {
            candidates.push((ViewRole::Search, search));
        }
        if let (Some(panel), None) = (self.views.panel, pending.landed) {
            candidates.push((ViewRole::Panel, panel));
        }
        let Some(role) = candidates
            .into_iter()
            .find(|(_, view)| self.host.request_focus(*view))
            .map(|(role, _)| role)
        else {
            return;
        };

        tracing::trace!(target: targets::CONTROLLER, ?role, "open focus landed");
        if let Some(session) = self.session.as_mut() {
            session.pending_focus = match role {
                ViewRole::Search => None,
                _ => Some(PendingFocus {
                    landed: Some(role),
                    ..pending
                }),
            };
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Route an intent to its handler.
    ///
    /// Returns whether the intent changed state or was consumed.
    /// Session-scoped intents fail with [`SelectError::MissingContext`] while
    /// closed.
    pub fn dispatch(&mut self, intent: SelectIntent) -> SelectResult<bool> {
        let _span = tracing::debug_span!(
            target: targets::CONTROLLER,
            span_names::INTENT,
            intent = ?intent
        )
        .entered();

        let handled = match intent {
            SelectIntent::OpenToggle => self.open_toggle(),
            SelectIntent::Open => self.open(),
            SelectIntent::Close => self.close(),
            SelectIntent::PointerDownOutside(target) => self.pointer_down_outside(target),
            SelectIntent::KeyInput(key) => self.key_input(key),
            SelectIntent::OptionPointerOver(id) => self.option_pointer_over(&id)?,
            SelectIntent::OptionActivate(id) => self.option_activate(&id)?,
            SelectIntent::QueryChanged(text) => self.set_query(&text)?,
            SelectIntent::ClearQuery => self.clear_query(),
            SelectIntent::FocusMoved(target) => self.focus_moved(target),
            SelectIntent::ViewMounted(role, view) => {
                self.view_mounted(role, view);
                true
            }
            SelectIntent::ViewUnmounted(role) => {
                self.view_unmounted(role);
                true
            }
            SelectIntent::GeometryChanged => self.geometry_changed(),
            SelectIntent::RemoveLast => self.remove_last(),
            SelectIntent::RemoveSelected(id) => self.remove_selected(&id),
        };
        Ok(handled)
    }
}

impl Drop for SelectController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for SelectController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectController")
            .field("base_id", &self.ids.base())
            .field("open", &self.open)
            .field("value", &self.value)
            .field("query", &self.filter.query())
            .field("cursor", &self.cursor)
            .field("options", &self.registry.len())
            .finish_non_exhaustive()
    }
}
