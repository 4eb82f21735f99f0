//! Data source traits.
//!
//! The engine never owns the data it displays. It asks a data source for
//! counts and heights ([`TableMetrics`]) and for the visual items that show
//! each row or header ([`TableDataSource`]).
//!
//! All calls are synchronous and must not re-enter the table view.

use super::index_path::IndexPath;
use crate::widget::{ItemKey, ItemStore, ViewItem};

/// Counts and sizes of the table's content.
///
/// Geometry is computed entirely from these answers, so they must be
/// consistent with each other for the duration of any single table call.
pub trait TableMetrics {
    /// Number of sections.
    fn section_count(&self) -> usize;

    /// Number of rows in `section`.
    fn row_count(&self, section: usize) -> usize;

    /// Height of the row at `index_path`. Must not be negative.
    fn row_height(&self, index_path: IndexPath) -> i32;

    /// Height of the header of `section`. Defaults to no header.
    fn header_height(&self, _section: usize) -> i32 {
        0
    }
}

/// A data source that also supplies visual items.
///
/// Items live in the view's [`ItemStore`]. An implementation should try
/// [`ItemStore::dequeue_reusable_cell`] first and only insert a new item when
/// nothing is available for reuse:
///
/// ```ignore
/// fn row_item(&mut self, items: &mut ItemStore<Cell>, path: IndexPath) -> Option<ItemKey> {
///     let key = items
///         .dequeue_reusable_cell("contact")
///         .unwrap_or_else(|| items.insert(Cell::new("contact")));
///     items.get_mut(key)?.set_text(&self.contacts[path.row].name);
///     Some(key)
/// }
/// ```
///
/// Returning `None` means "not ready"; the slot stays empty this pass. It is
/// asked for again by the next scroll pass that reaches it. Passes run after
/// an insertion, reload or deletion only scan from the changed row onward, so
/// an empty slot above that row stays empty until the view scrolls or is
/// refreshed.
pub trait TableDataSource: TableMetrics {
    /// The host's visual item type.
    type Item: ViewItem;

    /// Provide the item that shows the row at `index_path`.
    fn row_item(
        &mut self,
        items: &mut ItemStore<Self::Item>,
        index_path: IndexPath,
    ) -> Option<ItemKey>;

    /// Provide the item that shows the header of `section`.
    ///
    /// Only called for sections with a non-zero header height.
    fn header_item(
        &mut self,
        _items: &mut ItemStore<Self::Item>,
        _section: usize,
    ) -> Option<ItemKey> {
        None
    }
}
