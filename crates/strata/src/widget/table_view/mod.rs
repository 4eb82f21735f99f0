//! The sectioned table view.
//!
//! [`TableView`] ties the engine together: it owns the geometry, selection,
//! scroll state, visible set and every item, and drives a resolution pass
//! after each scroll or structural change.
//!
//! # Example
//!
//! ```ignore
//! use strata::prelude::*;
//!
//! let config = TableViewConfig::new().with_viewport(320, 480);
//! let mut table = TableView::new(config)?.with_data_source(Contacts::load());
//! table.reload_data()?;
//!
//! table.row_selected.connect(|path| {
//!     tracing::info!(%path, "contact selected");
//! });
//!
//! table.scroll_to_bottom();
//! ```

mod events;

pub use events::HitTarget;

use strata_core::logging::{span_names, targets};
use strata_core::{PerfSpan, Point, Rect, Signal, Size};

use super::item::ViewItem;
use super::item_store::{ItemKey, ItemStore};
use super::renderer::{Frame, ViewportRenderer};
use super::scroll::ScrollController;
use crate::config::{TableStyle, TableViewConfig};
use crate::error::{Result, TableError};
use crate::model::{GeometryModel, IndexPath, SelectionModel, StructuralChange, TableDataSource};

/// A virtualized, sectioned table view.
///
/// Only rows and headers that intersect the viewport have items; items that
/// scroll out are hidden and pooled for the data source to reuse.
///
/// Every operation runs to completion before returning. Data source
/// callbacks and signal slots must not call back into the view.
///
/// # Signals
///
/// - `row_selected(IndexPath)`: A press-and-release selected a row
/// - `row_deselected(IndexPath)`: A press-and-release deselected a row (multiple selection)
/// - `row_pressed(IndexPath)`: A row was pressed while selection is allowed
/// - `row_double_clicked(IndexPath)`: A row was double-clicked
/// - `header_selected(usize)`: A section header was pressed
/// - `scrolled(i32)`: The scroll offset changed
/// - `scrolled_to_top(())`: The offset changed to 0
/// - `scrolled_to_bottom(())`: The offset changed to the maximum
pub struct TableView<D: TableDataSource> {
    source: Option<D>,
    items: ItemStore<D::Item>,
    geometry: GeometryModel,
    selection: SelectionModel,
    renderer: ViewportRenderer,
    scroll: ScrollController,

    style: TableStyle,
    viewport: Size,
    wheel_scroll_factor: f32,
    /// Whether the page step was configured rather than following the
    /// viewport height.
    explicit_page_step: bool,
    /// Item under an unreleased press.
    pressed: Option<ItemKey>,

    pub row_selected: Signal<IndexPath>,
    pub row_deselected: Signal<IndexPath>,
    pub row_pressed: Signal<IndexPath>,
    pub row_double_clicked: Signal<IndexPath>,
    pub header_selected: Signal<usize>,
    pub scrolled: Signal<i32>,
    pub scrolled_to_top: Signal<()>,
    pub scrolled_to_bottom: Signal<()>,
}

impl<D: TableDataSource> TableView<D> {
    /// Create an empty table view.
    ///
    /// Content appears after a data source is set and
    /// [`reload_data`](Self::reload_data) is called.
    pub fn new(config: TableViewConfig) -> Result<Self> {
        config.validate()?;

        let mut selection = SelectionModel::new();
        selection.set_allows_selection(config.allows_selection());
        selection.set_allows_multiple_selection(config.allows_multiple_selection());

        Ok(Self {
            source: None,
            items: ItemStore::new(),
            geometry: GeometryModel::new(),
            selection,
            renderer: ViewportRenderer::new(),
            scroll: ScrollController::new(config.single_step(), config.page_step()),
            style: config.style(),
            viewport: config.viewport(),
            wheel_scroll_factor: config.wheel_scroll_factor(),
            explicit_page_step: config.has_explicit_page_step(),
            pressed: None,
            row_selected: Signal::new(),
            row_deselected: Signal::new(),
            row_pressed: Signal::new(),
            row_double_clicked: Signal::new(),
            header_selected: Signal::new(),
            scrolled: Signal::new(),
            scrolled_to_top: Signal::new(),
            scrolled_to_bottom: Signal::new(),
        })
    }

    /// Set the data source using builder pattern.
    pub fn with_data_source(mut self, source: D) -> Self {
        self.source = Some(source);
        self
    }

    // =========================================================================
    // Data Source
    // =========================================================================

    /// Replace the data source, returning the previous one.
    ///
    /// Nothing is re-queried until the next [`reload_data`](Self::reload_data).
    pub fn set_data_source(&mut self, source: D) -> Option<D> {
        self.source.replace(source)
    }

    pub fn data_source(&self) -> Option<&D> {
        self.source.as_ref()
    }

    pub fn data_source_mut(&mut self) -> Option<&mut D> {
        self.source.as_mut()
    }

    /// Re-query everything and rebuild from scratch.
    ///
    /// Selection is cleared and every item other than the footer is
    /// destroyed. If the new geometry cannot be built the view is left as
    /// it was.
    pub fn reload_data(&mut self) -> Result<()> {
        let _span = PerfSpan::new(span_names::RELOAD);
        let source = self.source.as_ref().ok_or(TableError::NoDataSource)?;
        self.geometry.rebuild(source)?;

        self.selection.clear();
        self.renderer.forget_visible();
        self.items.clear_except(self.renderer.footer());
        self.pressed = None;

        tracing::debug!(
            target: targets::TABLE,
            sections = self.geometry.section_count(),
            content_height = self.geometry.content_height(),
            "data reloaded"
        );
        self.update(None);
        Ok(())
    }

    /// Redraw every visible row and header against the current geometry.
    ///
    /// Visible items are returned to the pools and requested again, so the
    /// data source can refresh their content. Heights are not re-queried.
    pub fn refresh_content(&mut self) {
        self.renderer.retire_all(&mut self.items);
        self.update(None);
    }

    // =========================================================================
    // Structural Changes
    // =========================================================================

    /// Insert a section the data source already reports.
    pub fn insert_section(&mut self, section: usize) -> Result<()> {
        let source = self.source.as_ref().ok_or(TableError::NoDataSource)?;
        self.geometry.insert_section(source, section)?;
        self.apply_change(StructuralChange::SectionInserted(section));
        self.update(Some(IndexPath::new(section, 0)));
        Ok(())
    }

    /// Remove a section the data source no longer reports.
    ///
    /// Selected rows of the section are deselected.
    pub fn delete_section(&mut self, section: usize) -> Result<()> {
        self.geometry.delete_section(section)?;
        self.apply_change(StructuralChange::SectionDeleted(section));
        self.update(Some(IndexPath::new(section, 0)));
        Ok(())
    }

    /// Insert a row the data source already reports.
    pub fn insert_row(&mut self, index_path: IndexPath) -> Result<()> {
        let source = self.source.as_ref().ok_or(TableError::NoDataSource)?;
        self.geometry.insert_row(source, index_path)?;
        self.apply_change(StructuralChange::RowInserted(index_path));
        self.update(Some(index_path));
        Ok(())
    }

    /// Re-query one row's height and item.
    pub fn reload_row(&mut self, index_path: IndexPath) -> Result<()> {
        let source = self.source.as_ref().ok_or(TableError::NoDataSource)?;
        self.geometry.reload_row(source, index_path)?;
        self.renderer.retire_row(index_path, &mut self.items);
        self.update(Some(index_path));
        Ok(())
    }

    /// Remove a row the data source no longer reports.
    pub fn delete_row(&mut self, index_path: IndexPath) -> Result<()> {
        self.geometry.delete_row(index_path)?;
        self.apply_change(StructuralChange::RowDeleted(index_path));
        self.update(Some(index_path));
        Ok(())
    }

    fn apply_change(&mut self, change: StructuralChange) {
        tracing::debug!(target: targets::TABLE, ?change, "structure changed");
        self.renderer.apply_change(change, &mut self.items);
        self.selection.apply_change(change);
    }

    // =========================================================================
    // Footer
    // =========================================================================

    /// Show `item` below the last section. Replaces any previous footer.
    pub fn set_footer(&mut self, item: D::Item, height: i32) -> Result<ItemKey> {
        self.geometry.set_footer_height(Some(height))?;
        let key = self.items.insert(item);
        if let Some(previous) = self.renderer.set_footer(Some(key)) {
            self.items.remove(previous);
        }
        self.update(None);
        Ok(key)
    }

    /// Remove the footer, handing its item back.
    pub fn clear_footer(&mut self) -> Option<D::Item> {
        let key = self.renderer.set_footer(None)?;
        self.geometry.clear_footer();
        let item = self.items.remove(key);
        self.update(None);
        item
    }

    pub fn footer_item(&self) -> Option<ItemKey> {
        self.renderer.footer()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Sync the scroll range and run a forced pass.
    fn update(&mut self, start: Option<IndexPath>) {
        let moved = self
            .scroll
            .sync_range(self.geometry.content_height(), self.viewport.height);
        // A clamped offset can reveal rows before the hint.
        let start = if moved { None } else { start };
        self.resolve(start, true);
        if moved {
            self.notify_scrolled();
        }
    }

    fn resolve(&mut self, start: Option<IndexPath>, force: bool) -> bool {
        let Some(source) = self.source.as_mut() else {
            return false;
        };
        let frame = Frame {
            geometry: &self.geometry,
            selection: &self.selection,
            style: self.style,
            offset: self.scroll.value(),
            viewport: self.viewport,
        };
        self.renderer
            .render(&frame, source, &mut self.items, start, force)
    }

    /// Re-apply selection state to every visible row.
    fn restamp(&mut self) {
        for (path, key) in self.renderer.visible_rows() {
            if let Some(item) = self.items.get_mut(key) {
                item.set_selected(self.selection.is_selected(path));
            }
        }
    }

    pub fn style(&self) -> TableStyle {
        self.style
    }

    /// Change the header style and redraw.
    pub fn set_style(&mut self, style: TableStyle) {
        if self.style != style {
            self.style = style;
            self.update(None);
        }
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Scroll so that content coordinate `y` is at the viewport top.
    ///
    /// The offset is clamped to the scroll range. Returns `false`, without
    /// notifying, if the clamped offset is the current one.
    pub fn scroll_to(&mut self, y: i32) -> bool {
        if !self.scroll.set_value(y) {
            return false;
        }
        self.resolve(None, false);
        self.notify_scrolled();
        true
    }

    pub fn scroll_to_top(&mut self) -> bool {
        self.scroll_to(0)
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        self.scroll_to(self.scroll.maximum())
    }

    pub fn scroll_by(&mut self, delta: i32) -> bool {
        self.scroll_to(self.scroll.value().saturating_add(delta))
    }

    /// Scroll up by the controller's single step.
    pub fn step_up(&mut self) -> bool {
        self.scroll_by(-self.scroll.single_step())
    }

    /// Scroll down by the controller's single step.
    pub fn step_down(&mut self) -> bool {
        self.scroll_by(self.scroll.single_step())
    }

    /// Scroll up by one page. The page defaults to the viewport height.
    pub fn page_up(&mut self) -> bool {
        self.scroll_by(-self.scroll.page_step())
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll_by(self.scroll.page_step())
    }

    /// Scroll so the row's top is at the viewport top, as far as the range
    /// allows.
    pub fn scroll_to_index_path(&mut self, index_path: IndexPath) -> Result<bool> {
        self.geometry.check_row(index_path)?;
        let offset = self
            .geometry
            .row_span(index_path)
            .map_or(0, |span| span.offset);
        Ok(self.scroll_to(offset))
    }

    fn notify_scrolled(&self) {
        let value = self.scroll.value();
        self.scrolled.emit(value);
        if value == 0 {
            self.scrolled_to_top.emit(());
        } else if value == self.scroll.maximum() {
            self.scrolled_to_bottom.emit(());
        }
    }

    /// Viewport width by total content height.
    pub fn content_size(&self) -> Size {
        Size::new(self.viewport.width, self.geometry.content_height())
    }

    /// The current scroll offset.
    pub fn content_offset(&self) -> i32 {
        self.scroll.value()
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Resize the viewport. Items are resized to the new width.
    pub fn set_viewport_size(&mut self, size: Size) -> Result<()> {
        if size.width < 0 || size.height < 0 {
            return Err(TableError::invalid_config(format!(
                "viewport size {}x{} is negative",
                size.width, size.height
            )));
        }
        self.viewport = size;
        if !self.explicit_page_step {
            self.scroll.set_page_step(size.height);
        }
        self.update(None);
        Ok(())
    }

    pub fn scroll_controller(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn wheel_scroll_factor(&self) -> f32 {
        self.wheel_scroll_factor
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn allows_selection(&self) -> bool {
        self.selection.allows_selection()
    }

    pub fn allows_multiple_selection(&self) -> bool {
        self.selection.allows_multiple_selection()
    }

    pub fn set_allows_selection(&mut self, allow: bool) {
        self.selection.set_allows_selection(allow);
        self.restamp();
    }

    pub fn set_allows_multiple_selection(&mut self, allow: bool) {
        self.selection.set_allows_multiple_selection(allow);
        self.restamp();
    }

    /// Select a row. Returns `true` if the selection changed.
    ///
    /// Does not emit `row_selected`; that signal reports interaction.
    pub fn select_row(&mut self, index_path: IndexPath) -> Result<bool> {
        self.geometry.check_row(index_path)?;
        let changed = self.selection.select(index_path);
        if changed {
            self.restamp();
        }
        Ok(changed)
    }

    /// Deselect a row. Returns `true` if the selection changed.
    pub fn deselect_row(&mut self, index_path: IndexPath) -> Result<bool> {
        self.geometry.check_row(index_path)?;
        let changed = self.selection.deselect(index_path);
        if changed {
            self.restamp();
        }
        Ok(changed)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.restamp();
    }

    pub fn is_selected(&self, index_path: IndexPath) -> bool {
        self.selection.is_selected(index_path)
    }

    pub fn selected_index_path(&self) -> Option<IndexPath> {
        self.selection.selected_index_path()
    }

    pub fn selected_index_paths(&self) -> Vec<IndexPath> {
        self.selection.selected_index_paths()
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn geometry(&self) -> &GeometryModel {
        &self.geometry
    }

    pub fn items(&self) -> &ItemStore<D::Item> {
        &self.items
    }

    pub fn item(&self, key: ItemKey) -> Option<&D::Item> {
        self.items.get(key)
    }

    pub fn item_mut(&mut self, key: ItemKey) -> Option<&mut D::Item> {
        self.items.get_mut(key)
    }

    /// Items of the visible rows, in document order.
    pub fn visible_items(&self) -> Vec<ItemKey> {
        self.renderer.visible_rows().map(|(_, key)| key).collect()
    }

    /// Paths of the visible rows, in document order.
    pub fn visible_index_paths(&self) -> Vec<IndexPath> {
        self.renderer.visible_rows().map(|(path, _)| path).collect()
    }

    /// Items of the visible headers, in section order.
    pub fn visible_header_items(&self) -> Vec<ItemKey> {
        self.renderer.visible_headers().map(|(_, key)| key).collect()
    }

    /// The item showing a row, if the row is visible.
    pub fn item_for_index_path(&self, index_path: IndexPath) -> Option<ItemKey> {
        self.renderer.row_item(index_path)
    }

    /// The item showing a section header, if it is visible.
    pub fn header_item_for_section(&self, section: usize) -> Option<ItemKey> {
        self.renderer.header_item(section)
    }

    /// The row a visible item is showing.
    pub fn index_path_for_item(&self, key: ItemKey) -> Option<IndexPath> {
        self.renderer.index_path_for(key)
    }

    /// The visible row under a point in viewport coordinates.
    pub fn index_path_at(&self, point: Point) -> Option<IndexPath> {
        self.renderer.visible_rows().find_map(|(path, key)| {
            self.items
                .get(key)
                .is_some_and(|item| item.contains(point))
                .then_some(path)
        })
    }

    /// The visible header under a point in viewport coordinates.
    ///
    /// Where headers overlap, the one drawn on top wins.
    pub fn header_at(&self, point: Point) -> Option<usize> {
        self.renderer
            .visible_headers()
            .filter_map(|(section, key)| {
                let item = self.items.get(key)?;
                item.contains(point)
                    .then(|| (item.item_base().z_order(), section))
            })
            .max()
            .map(|(_, section)| section)
    }

    /// A row's rectangle in content coordinates.
    pub fn rect_for_row(&self, index_path: IndexPath) -> Result<Rect> {
        self.geometry.check_row(index_path)?;
        let span = self
            .geometry
            .row_span(index_path)
            .ok_or_else(|| TableError::row_out_of_range(index_path, 0))?;
        Ok(Rect::new(0, span.offset, self.viewport.width, span.height))
    }

    /// A section header's rectangle in content coordinates.
    pub fn rect_for_header(&self, section: usize) -> Result<Rect> {
        let span = self.geometry.header_span(section).ok_or_else(|| {
            TableError::section_out_of_range(section, self.geometry.section_count())
        })?;
        Ok(Rect::new(0, span.offset, self.viewport.width, span.height))
    }
}

impl<D: TableDataSource> std::fmt::Debug for TableView<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableView")
            .field("has_data_source", &self.source.is_some())
            .field("items", &self.items.len())
            .field("geometry", &self.geometry)
            .field("selection", &self.selection)
            .field("renderer", &self.renderer)
            .field("scroll", &self.scroll)
            .field("style", &self.style)
            .field("viewport", &self.viewport)
            .finish()
    }
}
