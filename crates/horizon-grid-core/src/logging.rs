//! Logging and tracing facilities for Horizon Grid.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_grid=debug")
//!         .init();
//! }
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "horizon_grid_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Selection and editing state machine target.
    pub const SELECTION: &str = "horizon_grid::selection";
    /// Clipboard bridge target.
    pub const CLIPBOARD: &str = "horizon_grid::clipboard";
    /// Row mutation target.
    pub const ROWS: &str = "horizon_grid::rows";
    /// Validation overlay target.
    pub const VALIDATION: &str = "horizon_grid::validation";
    /// Options loading target.
    pub const OPTIONS: &str = "horizon_grid::options";
    /// Layout measurement target.
    pub const LAYOUT: &str = "horizon_grid::geometry";
    /// Performance spans target.
    pub const PERF: &str = "horizon_grid::perf";
}

/// A guard that keeps a tracing span entered until it is dropped.
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
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
