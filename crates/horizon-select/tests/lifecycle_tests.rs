//! Listener teardown, deferred focus and degraded hosts.

mod common;

use common::Host;
use horizon_select::{
    DismissFlags, DismissReason, Key, ListenerKind, ListenerRegistry, SelectController,
    SelectError, SelectIntent, SelectionValue, ViewRole,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn test_no_listener_leak_across_sessions() {
    let mut host = Host::new(SelectionValue::Single(None));
    for _ in 0..50 {
        host.open_with_search();
        assert_eq!(host.listeners.active_count(), 3);
        host.select.close();
        assert_eq!(host.listeners.active_count(), 0);
    }
    assert_eq!(host.listeners.total_attached(), 150);
    assert_eq!(host.select.sessions_started(), 50);
}

#[test]
fn test_listeners_released_by_every_dismissal() {
    let mut host = Host::new(SelectionValue::Single(None));

    host.open();
    host.select.pointer_down_outside(Some(host.elsewhere));
    assert_eq!(host.listeners.active_count(), 0);

    host.open();
    host.select.key_input(Key::Escape);
    assert_eq!(host.listeners.active_count(), 0);

    host.open();
    host.select.focus_moved(None);
    assert_eq!(host.listeners.active_count(), 0);

    host.open();
    host.select.option_activate("dog").unwrap();
    assert_eq!(host.listeners.active_count(), 0);
}

#[test]
fn test_drop_while_open_releases_listeners() {
    let listeners = ListenerRegistry::new();
    let mut host = Host::with_listeners(SelectionValue::Single(None), listeners.clone());
    host.open_with_search();
    assert_eq!(listeners.active_count(), 3);

    drop(host);
    assert_eq!(listeners.active_count(), 0);
}

#[test]
fn test_dispose_reports_reason_once() {
    let mut host = Host::new(SelectionValue::Single(None));
    let reasons = Arc::new(Mutex::new(Vec::new()));
    let reasons_clone = reasons.clone();
    host.select
        .dismissed
        .connect(move |reason: &DismissReason| reasons_clone.lock().push(*reason));

    host.open();
    host.select.dispose();
    host.select.dispose();
    assert_eq!(*reasons.lock(), vec![DismissReason::Disposed]);
    assert_eq!(host.listeners.active_count(), 0);
}

#[test]
fn test_focus_lands_when_search_mounts_late() {
    let mut host = Host::new(SelectionValue::Single(None));
    host.select.open();
    assert_eq!(host.focused(), Some(host.trigger));
    assert!(host.select.is_focus_pending());

    host.select.view_mounted(ViewRole::Panel, host.panel);
    assert_eq!(host.focused(), Some(host.panel));

    host.select.view_mounted(ViewRole::Search, host.search);
    assert_eq!(host.focused(), Some(host.search));
    assert!(!host.select.is_focus_pending());
}

#[test]
fn test_unfocusable_search_falls_back_to_panel() {
    let mut host = Host::new(SelectionValue::Single(None));
    host.tree.write().set_focusable(host.search, false);

    host.select.open();
    host.select.view_mounted(ViewRole::Search, host.search);
    assert_eq!(host.focused(), Some(host.trigger));
    host.select.view_mounted(ViewRole::Panel, host.panel);
    assert_eq!(host.focused(), Some(host.panel));

    assert!(host.select.key_input(Key::ArrowDown));
    assert_eq!(host.select.cursor(), Some("cat"));
    assert!(host.select.key_input(Key::Escape));
    assert!(!host.select.is_open());
}

#[test]
fn test_focus_window_closes_after_retries() {
    let mut host = Host::new(SelectionValue::Single(None));
    host.select.set_focus_retry_window(2);
    host.tree.write().set_focusable(host.panel, false);

    host.select.open();
    host.select.view_mounted(ViewRole::Panel, host.panel);
    assert!(host.select.is_focus_pending());
    host.select.view_mounted(ViewRole::Panel, host.panel);
    assert!(!host.select.is_focus_pending());

    host.select.view_mounted(ViewRole::Search, host.search);
    assert_eq!(host.focused(), Some(host.trigger));
}

#[test]
fn test_focus_window_is_per_session() {
    let mut host = Host::new(SelectionValue::Single(None));
    host.open();
    host.select.close();

    host.select.open();
    assert!(host.select.is_focus_pending());
    host.select.view_mounted(ViewRole::Search, host.search);
    assert_eq!(host.focused(), Some(host.search));
}

#[test]
fn test_unsupported_focus_tracking_degrades() {
    let listeners = ListenerRegistry::with_unsupported(ListenerKind::FocusChange);
    let mut host = Host::with_listeners(SelectionValue::Single(None), listeners.clone());
    host.open_with_search();

    assert!(host.select.is_open());
    assert_eq!(listeners.active_count(), 2);
    assert!(!host.select.has_listener(ListenerKind::FocusChange));

    assert!(!host.select.focus_moved(Some(host.elsewhere)));
    assert!(host.select.is_open());

    assert!(host.select.pointer_down_outside(Some(host.elsewhere)));
    assert_eq!(listeners.active_count(), 0);
}

#[test]
fn test_unsupported_pointer_keeps_keyboard_dismissal() {
    let listeners = ListenerRegistry::with_unsupported(ListenerKind::PointerDown);
    let mut host = Host::with_listeners(SelectionValue::Single(None), listeners);
    host.open_with_search();

    assert!(!host.select.pointer_down_outside(Some(host.elsewhere)));
    assert!(host.select.is_open());
    assert!(host.select.key_input(Key::Escape));
    assert!(!host.select.is_open());
}

#[test]
fn test_disabled_dismissal_triggers() {
    let mut host = Host::new(SelectionValue::Single(None));
    host.select.set_dismiss_flags(DismissFlags::ESCAPE);
    host.open_with_search();

    assert_eq!(host.listeners.active_count(), 1);
    assert!(!host.select.pointer_down_outside(Some(host.elsewhere)));
    assert!(!host.select.focus_moved(Some(host.elsewhere)));
    assert!(host.select.is_open());

    host.select.set_dismiss_flags(DismissFlags::NONE);
    assert!(host.select.key_input(Key::Escape));
    assert!(!host.select.is_open());

    host.open();
    assert!(!host.select.key_input(Key::Escape));
    assert!(host.select.is_open());
}

#[test]
fn test_session_scoped_intents_while_closed() {
    let mut host = Host::new(SelectionValue::Single(None));
    for intent in [
        SelectIntent::OptionPointerOver("cat".into()),
        SelectIntent::OptionActivate("cat".into()),
        SelectIntent::QueryChanged("c".into()),
    ] {
        assert!(intent.is_session_scoped());
        let err = host.select.dispatch(intent).unwrap_err();
        assert!(matches!(err, SelectError::MissingContext { .. }));
    }
    assert!(host.emitted().is_empty());
}

#[test]
fn test_open_without_trigger_has_no_placement() {
    let mut select = SelectController::new(SelectionValue::Single(None));
    assert!(select.open());
    assert!(select.is_open());
    assert_eq!(select.placement(), None);
    assert!(!select.geometry_changed());
}

#[test]
fn test_placement_cleared_on_close() {
    let mut host = Host::new(SelectionValue::Single(None));
    let placements = Arc::new(Mutex::new(Vec::new()));
    let placements_clone = placements.clone();
    host.select
        .placement_changed
        .connect(move |placement: &Option<horizon_select::Placement>| {
            placements_clone.lock().push(placement.is_some());
        });

    host.open();
    let placement = host.select.placement().cloned().unwrap();
    assert_eq!(placement.offset_x, 20.0);
    assert_eq!(placement.offset_y, 48.0);
    assert_eq!(placement.attribute("data-placement"), Some("bottom-start"));

    host.select.close();
    assert_eq!(host.select.placement(), None);
    assert_eq!(*placements.lock(), vec![true, false]);
}

#[test]
fn test_search_unmount_clears_query() {
    let mut host = Host::new(SelectionValue::Single(None));
    let queries = Arc::new(Mutex::new(Vec::new()));
    let queries_clone = queries.clone();
    host.select
        .query_changed
        .connect(move |query: &String| queries_clone.lock().push(query.clone()));

    host.open_with_search();
    host.select.set_query("do").unwrap();
    host.select.view_unmounted(ViewRole::Search);

    assert_eq!(host.select.query(), "");
    assert_eq!(host.select.filter_state().len(), 4);
    assert_eq!(*queries.lock(), vec!["do".to_string(), String::new()]);
}

#[test]
fn test_set_options_while_open() {
    let mut host = Host::new(SelectionValue::Single(None));
    host.open_with_search();
    host.select.set_query("c").unwrap();
    host.select.option_pointer_over("cow").unwrap();

    host.select.set_options(common::options(&[("cat", "Cat"), ("yak", "Yak")]));
    assert_eq!(host.select.filter_state().matched_ids(), &["cat"]);
    assert_eq!(host.select.cursor(), None);
    assert_eq!(host.select.query(), "c");
}

#[test]
fn test_registry_warnings_surface() {
    let select = SelectController::new(SelectionValue::Single(None)).with_options([
        horizon_select::OptionDecl::new("blank"),
        horizon_select::OptionDecl::text("cat", "Cat"),
        horizon_select::OptionDecl::text("cat", "Kitty"),
    ]);
    let warnings = select.registry().warnings();
    assert_eq!(warnings.len(), 2);
    assert_eq!(select.registry().text("cat"), Some("Kitty"));
    assert_eq!(select.registry().text("blank"), Some(""));
}
