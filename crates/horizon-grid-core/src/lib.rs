//! Core systems for Horizon Grid.
//!
//! This crate provides the foundational pieces the data grid is built on:
//!
//! - **Signal/Slot System**: Type-safe notification from the grid to its host
//! - **Geometry**: `Point`, `Size` and `Rect` used by hit testing
//! - **Logging**: `tracing` targets and perf spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;
pub mod types;

pub use error::{CoreError, Result, SignalError};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use types::{Point, Rect, Size};
