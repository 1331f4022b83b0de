//! Scripted select session.
//!
//! Loads a select from TOML, then replays the intents a host would forward
//! while a user searches, navigates with the keyboard and picks two animals.
//! Each step prints the resulting snapshot.
//!
//! Run with: cargo run -p horizon-select --example scripted_session
//! Use `RUST_LOG=horizon_select=debug` to see intent handling.

use std::sync::Arc;

use horizon_select::{
    Key, Rect, SelectConfig, SelectController, SelectIntent, SelectSnapshot, SelectionValue,
    SharedViewTree, ViewRole, ViewTree, highlight_segments,
};
use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
base_id = "animals"
placeholder = "Pick some animals"
mode = "multiple"
placement = "below-align-left"
panel_gap = 4.0

[[options]]
id = "cat"
text = "Cat"

[[options]]
id = "dog"
text = "Dog"

[[options]]
id = "cow"
text = "Cow"

[[options]]
id = "caracal"
label = "Caracal"

[[options]]
id = "aardvark"
text = "Aardvark"
"#;

fn print_snapshot(step: &str, snapshot: &SelectSnapshot) {
    println!("── {step}");
    println!(
        "   trigger: {:?} ({})",
        snapshot.display_text,
        if snapshot.is_open() { "open" } else { "closed" }
    );
    if !snapshot.is_open() {
        return;
    }
    println!("   query:   {:?}", snapshot.filter_state.query());
    for option in &snapshot.options {
        let text: String = highlight_segments(&option.text, &option.spans)
            .iter()
            .map(|segment| {
                if segment.is_match {
                    format!("[{}]", segment.text)
                } else {
                    segment.text.to_string()
                }
            })
            .collect();
        println!(
            "   {} {} {}",
            if option.is_focused { ">" } else { " " },
            if option.is_selected { "☑" } else { "☐" },
            text
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SelectConfig::from_toml_str(CONFIG)?;

    let mut tree = ViewTree::new();
    let window = tree.insert("window", None);
    let trigger = tree.insert("trigger", Some(window));
    let panel = tree.insert("panel", Some(window));
    let search = tree.insert("search", Some(panel));
    tree.set_geometry(window, Rect::new(0.0, 0.0, 640.0, 480.0));
    tree.set_geometry(trigger, Rect::new(24.0, 24.0, 200.0, 32.0));
    tree.set_geometry(panel, Rect::new(0.0, 0.0, 200.0, 180.0));
    tree.set_focus(Some(trigger));
    let tree = SharedViewTree::from(tree);

    let mut select = SelectController::from_config(config).with_view_host(tree.clone());

    // The host owns the value; collect commits and feed them back.
    let committed: Arc<Mutex<Vec<SelectionValue>>> = Arc::new(Mutex::new(Vec::new()));
    let committed_clone = committed.clone();
    select.selection_changed.connect(move |value| {
        committed_clone.lock().push(value.clone());
    });
    select.dismissed.connect(|reason| {
        tracing::info!(%reason, "panel dismissed");
    });

    let script = [
        ("mount trigger", SelectIntent::ViewMounted(ViewRole::Trigger, trigger)),
        ("open", SelectIntent::OpenToggle),
        ("mount panel", SelectIntent::ViewMounted(ViewRole::Panel, panel)),
        ("mount search", SelectIntent::ViewMounted(ViewRole::Search, search)),
        ("type \"ca\"", SelectIntent::QueryChanged("ca".into())),
        ("arrow down", SelectIntent::KeyInput(Key::ArrowDown)),
        ("arrow down", SelectIntent::KeyInput(Key::ArrowDown)),
        ("enter", SelectIntent::KeyInput(Key::Enter)),
        ("type \"a\"", SelectIntent::QueryChanged("a".into())),
        ("click aardvark", SelectIntent::OptionActivate("aardvark".into())),
        ("escape", SelectIntent::KeyInput(Key::Escape)),
        ("backspace on trigger", SelectIntent::KeyInput(Key::Backspace)),
    ];

    for (step, intent) in script {
        select.dispatch(intent)?;
        let pending: Vec<_> = committed.lock().drain(..).collect();
        for value in pending {
            select.set_value(value)?;
        }
        print_snapshot(step, &select.snapshot());
    }

    println!();
    println!("Final value: {:?}", select.value());
    println!("Views:\n{}", tree.read().format_tree());
    Ok(())
}
