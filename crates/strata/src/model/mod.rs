//! Data-side types of the table engine.
//!
//! Nothing in this module knows about visual items except the
//! [`TableDataSource`] trait, which hands them out.
//!
//! # Core Types
//!
//! - `IndexPath`: Address of one row, ordered section first
//! - `StructuralChange`: An insertion or deletion that renumbers paths
//! - `TableMetrics` / `TableDataSource`: What the engine asks the host
//! - `GeometryModel`: Offsets and heights of every header and row
//! - `SelectionModel`: Single or multiple row selection
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────┐  counts, heights  ┌───────────────┐
//! │  DataSource  │──────────────────>│ GeometryModel │
//! │              │                   └───────┬───────┘
//! │              │  items                    │ spans
//! │              │─────────────┐             v
//! └──────────────┘             │     ┌───────────────┐     ┌────────────────┐
//!                              └────>│   Renderer    │<────│ SelectionModel │
//!                                    └───────────────┘     └────────────────┘
//! ```

mod geometry;
mod index_path;
mod selection;
mod source;

pub use geometry::{GeometryModel, Span};
pub use index_path::{IndexPath, StructuralChange};
pub use selection::SelectionModel;
pub use source::{TableDataSource, TableMetrics};
