//! Strata - a virtualized, sectioned table view engine.
//!
//! Strata presents an arbitrarily large collection of rows, grouped into
//! sections with optional headers, while keeping items only for what
//! intersects the viewport. Items that scroll out are hidden and pooled so
//! the data source can reuse them.
//!
//! This crate re-exports everything from `strata-core`.
//!
//! # Example
//!
//! ```
//! use strata::prelude::*;
//!
//! struct Cell(ItemBase);
//!
//! impl ViewItem for Cell {
//!     fn item_base(&self) -> &ItemBase {
//!         &self.0
//!     }
//!
//!     fn item_base_mut(&mut self) -> &mut ItemBase {
//!         &mut self.0
//!     }
//! }
//!
//! struct Numbers;
//!
//! impl TableMetrics for Numbers {
//!     fn section_count(&self) -> usize {
//!         1
//!     }
//!
//!     fn row_count(&self, _section: usize) -> usize {
//!         1_000
//!     }
//!
//!     fn row_height(&self, _index_path: IndexPath) -> i32 {
//!         20
//!     }
//! }
//!
//! impl TableDataSource for Numbers {
//!     type Item = Cell;
//!
//!     fn row_item(&mut self, items: &mut ItemStore<Cell>, _index_path: IndexPath) -> Option<ItemKey> {
//!         Some(
//!             items
//!                 .dequeue_reusable_cell("number")
//!                 .unwrap_or_else(|| items.insert(Cell(ItemBase::new("number")))),
//!         )
//!     }
//! }
//!
//! fn main() -> strata::Result<()> {
//!     let config = TableViewConfig::new().with_viewport(200, 100);
//!     let mut table = TableView::new(config)?.with_data_source(Numbers);
//!     table.reload_data()?;
//!
//!     // Five rows fit; only five items exist.
//!     assert_eq!(table.visible_items().len(), 5);
//!     assert_eq!(table.items().len(), 5);
//!
//!     // The same five items now show the last five rows.
//!     table.scroll_to_bottom();
//!     assert_eq!(table.content_offset(), 19_900);
//!     assert_eq!(table.items().len(), 5);
//!     Ok(())
//! }
//! ```

pub use strata_core::*;

pub mod config;
pub mod error;
pub mod model;
pub mod prelude;
pub mod widget;

pub use config::{TableStyle, TableViewConfig};
pub use error::{Result, TableError};
pub use model::{IndexPath, TableDataSource, TableMetrics};
pub use widget::{ItemBase, ItemKey, ItemStore, SelectionStyle, TableView, ViewItem};
