//! Core systems for Horizon Select.
//!
//! This crate provides the foundational pieces shared by the select engine:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Geometry**: Points, sizes and rectangles reported by view hosts
//! - **Logging**: Tracing targets, span names and the `PerfSpan` guard
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let open_changed = Signal::<bool>::new();
//!
//! let conn_id = open_changed.connect(|open| {
//!     println!("Panel open: {}", open);
//! });
//!
//! open_changed.emit(true);
//! open_changed.disconnect(conn_id);
//! ```

pub mod geometry;
pub mod logging;
pub mod signal;

pub use geometry::{Point, Rect, Size};
pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
