//! Logging facilities for Horizon Select.
//!
//! Horizon Select uses the `tracing` crate for instrumentation. Every module
//! logs with an explicit target from [`targets`], so hosts can filter one
//! subsystem at a time. To see logs, install a subscriber in the host:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("horizon_select=debug"))
//!         .init();
//! }
//! ```

/// Span names used throughout Horizon Select for tracing.
pub mod span_names {
    /// One open session of a select controller.
    pub const SESSION: &str = "horizon_select::session";
    /// Handling of a single user intent.
    pub const INTENT: &str = "horizon_select::intent";
    /// One filter pass over the option registry.
    pub const FILTER: &str = "horizon_select::filter";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_select_core::signal";
    /// Open/closed controller target.
    pub const CONTROLLER: &str = "horizon_select::controller";
    /// Option registry target.
    pub const REGISTRY: &str = "horizon_select::registry";
    /// Search filter target.
    pub const FILTER: &str = "horizon_select::filter";
    /// Dismissal listener target.
    pub const INPUT: &str = "horizon_select::input";
    /// View host target.
    pub const VIEW: &str = "horizon_select::view";
    /// Positioning target.
    pub const PLACEMENT: &str = "horizon_select::placement";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_select::config";
    /// Performance spans.
    pub const PERF: &str = "horizon_select::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
