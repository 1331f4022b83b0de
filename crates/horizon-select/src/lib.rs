//! Horizon Select - a headless select/combobox engine.
//!
//! The engine owns the behaviour of a dropdown selection control: the
//! open/closed lifecycle, single and multiple selection, incremental search,
//! keyboard focus over the filtered options and dismissal on outside presses,
//! Escape and focus loss. It renders nothing. Hosts drive it with intents and
//! render from [`SelectSnapshot`] or the fragment props.
//!
//! # Example
//!
//! ```
//! use horizon_select::{Key, OptionDecl, SelectController, SelectionValue};
//!
//! let mut select = SelectController::new(SelectionValue::Multiple(None))
//!     .with_placeholder("Pick animals")
//!     .with_options([
//!         OptionDecl::text("cat", "Cat"),
//!         OptionDecl::text("dog", "Dog"),
//!         OptionDecl::text("caracal", "Caracal"),
//!     ]);
//!
//! select.open();
//! select.set_query("ca").unwrap();
//! assert_eq!(select.filter_state().matched_ids(), &["cat", "caracal"]);
//!
//! select.option_activate("caracal").unwrap();
//! assert!(select.is_open());
//! assert_eq!(select.display_text(), "Pick animals");
//! ```
//!
//! The selection value is controlled: `option_activate` emits
//! `selection_changed` and the display text only changes once the host
//! passes the new value to [`SelectController::set_value`].

pub mod config;
pub mod controller;
pub mod dismiss;
pub mod error;
pub mod filter;
pub mod focus;
pub mod fragments;
pub mod ids;
pub mod input;
pub mod intent;
pub mod placement;
pub mod registry;
pub mod selection;
pub mod snapshot;
pub mod view;

pub use horizon_select_core::{
    ConnectionGuard, ConnectionId, PerfSpan, Point, Rect, Signal, Size, logging,
};

pub use config::{DismissConfig, SelectConfig};
pub use controller::{OpenState, SelectController};
pub use dismiss::{DismissFlags, DismissReason};
pub use error::{AttachError, ConfigurationWarning, SelectError, SelectResult};
pub use filter::{FilterState, MatchSpan, TextSegment, filter, highlight_segments};
pub use focus::Direction;
pub use fragments::{ListBoxProps, OptionProps, PanelProps, SearchProps, TriggerProps};
pub use ids::ElementIds;
pub use input::{InputSource, Key, ListenerId, ListenerKind, ListenerRegistry};
pub use intent::SelectIntent;
pub use placement::{AnchoredPlacement, PanelPlacement, Placement, PositioningCoordinator};
pub use registry::{OptionDecl, OptionRegistry, SelectOption};
pub use selection::{SelectionMode, SelectionValue};
pub use snapshot::{OptionState, SelectSnapshot};
pub use view::{SharedViewTree, ViewHost, ViewId, ViewRole, ViewTree};

static_assertions::assert_impl_all!(SelectionValue: Send, Sync);
static_assertions::assert_impl_all!(SelectSnapshot: Send, Sync);
