//! Core systems for Strata.
//!
//! This crate provides the foundational pieces the table engine is built on:
//!
//! - **Signal/Slot System**: Type-safe, synchronous change notification
//! - **Logging**: `tracing` targets, span names and performance guards
//! - **Geometry**: Integer `Point`, `Size` and `Rect`
//!
//! # Signal/Slot Example
//!
//! ```
//! use strata_core::Signal;
//!
//! // Create a signal that notifies when a row is pressed
//! let row_pressed = Signal::<usize>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = row_pressed.connect(|row| {
//!     println!("Row {} pressed", row);
//! });
//!
//! row_pressed.emit(3);
//!
//! // Disconnect when done
//! row_pressed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;
pub mod types;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use types::{Point, Rect, Size};

// Used by the exported logging macros.
#[doc(hidden)]
pub use tracing;
