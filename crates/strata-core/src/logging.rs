//! Logging and performance tracing for Strata.
//!
//! Strata uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("strata::render=trace,strata::geometry=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every subsystem logs under one of the [`targets`], so filtering can be as
//! coarse or fine as needed.

/// Span names used throughout Strata for tracing.
///
/// These constants can be used to filter traces for specific passes.
pub mod span_names {
    /// Full geometry rebuild from the data source.
    pub const REBUILD: &str = "strata::rebuild";
    /// Viewport resolution pass.
    pub const RENDER: &str = "strata::render";
    /// Reload teardown and rebuild.
    pub const RELOAD: &str = "strata::reload";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Fallback target used by the `strata_*!` macros.
    pub const CORE: &str = "strata";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "strata_core::signal";
    /// Offset and height bookkeeping.
    pub const GEOMETRY: &str = "strata::geometry";
    /// Visible set diffing and item placement.
    pub const RENDER: &str = "strata::render";
    /// Selection state changes.
    pub const SELECTION: &str = "strata::selection";
    /// Scroll offset and range updates.
    pub const SCROLL: &str = "strata::scroll";
    /// Item recycling.
    pub const REUSE: &str = "strata::reuse";
    /// Table view public operations.
    pub const TABLE: &str = "strata::table";
    /// Performance spans.
    pub const PERF: &str = "strata::perf";
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
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// Thin wrappers around the `tracing` macros with the [`targets::CORE`]
/// target filled in.
#[macro_export]
macro_rules! strata_trace {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "strata", $($arg)*)
    };
}

#[macro_export]
macro_rules! strata_debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "strata", $($arg)*)
    };
}

#[macro_export]
macro_rules! strata_info {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "strata", $($arg)*)
    };
}

#[macro_export]
macro_rules! strata_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "strata", $($arg)*)
    };
}

#[macro_export]
macro_rules! strata_error {
    ($($arg:tt)*) => {
        $crate::tracing::error!(target: "strata", $($arg)*)
    };
}
