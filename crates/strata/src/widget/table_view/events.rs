//! Pointer and wheel input.
//!
//! Events arrive either as points in viewport coordinates, which are
//! hit-tested against the visible items, or already routed to an item by
//! the host (`item_*` methods).

use strata_core::Point;
use strata_core::logging::targets;

use super::TableView;
use crate::model::{IndexPath, TableDataSource};
use crate::widget::item::ViewItem;
use crate::widget::item_store::ItemKey;

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    Row(IndexPath),
    Header(usize),
}

impl<D: TableDataSource> TableView<D> {
    // =========================================================================
    // Pointer
    // =========================================================================

    /// Handle a press at `point`. Headers are tested before rows.
    pub fn mouse_press(&mut self, point: Point) -> Option<HitTarget> {
        if let Some(section) = self.header_at(point) {
            let key = self.renderer.header_item(section)?;
            return self.header_pressed(key).map(HitTarget::Header);
        }
        let path = self.index_path_at(point)?;
        let key = self.renderer.row_item(path)?;
        self.item_pressed(key).map(HitTarget::Row)
    }

    /// Handle a release at `point`, completing the press that preceded it.
    pub fn mouse_release(&mut self, point: Point) -> Option<IndexPath> {
        let key = self.pressed?;
        let inside = self
            .items
            .get(key)
            .is_some_and(|item| item.contains(point));
        self.item_released(key, inside)
    }

    pub fn mouse_double_click(&mut self, point: Point) -> Option<IndexPath> {
        let path = self.index_path_at(point)?;
        let key = self.renderer.row_item(path)?;
        self.item_double_clicked(key)
    }

    /// A visible row item was pressed.
    ///
    /// With selection allowed this toggles the row (multiple selection) or
    /// makes it the selection (single selection), then emits `row_pressed`.
    pub fn item_pressed(&mut self, key: ItemKey) -> Option<IndexPath> {
        let path = self.renderer.index_path_for(key)?;
        self.pressed = Some(key);
        if !self.selection.allows_selection() {
            return Some(path);
        }

        let selected = self.selection.toggle(path);
        self.restamp();
        tracing::trace!(target: targets::TABLE, %path, selected, "row pressed");
        self.row_pressed.emit(path);
        Some(path)
    }

    /// A pressed row item was released, `inside` it or not.
    ///
    /// A release inside the pressed item reports the selection outcome:
    /// `row_deselected` if a multiple-selection toggle removed the row,
    /// `row_selected` otherwise.
    pub fn item_released(&mut self, key: ItemKey, inside: bool) -> Option<IndexPath> {
        let pressed = self.pressed.take();
        if !inside || pressed != Some(key) || !self.selection.allows_selection() {
            return None;
        }
        let path = self.renderer.index_path_for(key)?;

        if self.selection.allows_multiple_selection() && !self.selection.is_selected(path) {
            self.row_deselected.emit(path);
        } else {
            self.row_selected.emit(path);
        }
        Some(path)
    }

    pub fn item_double_clicked(&mut self, key: ItemKey) -> Option<IndexPath> {
        let path = self.renderer.index_path_for(key)?;
        self.row_double_clicked.emit(path);
        Some(path)
    }

    /// A visible header item was pressed.
    pub fn header_pressed(&mut self, key: ItemKey) -> Option<usize> {
        let section = self.renderer.section_for(key)?;
        tracing::trace!(target: targets::TABLE, section, "header pressed");
        self.header_selected.emit(section);
        Some(section)
    }

    // =========================================================================
    // Wheel and Scroll Bar
    // =========================================================================

    /// Scroll by a wheel delta, scaled by the configured factor. Positive
    /// deltas scroll toward the top.
    pub fn wheel(&mut self, delta_y: i32) -> bool {
        let target = self
            .scroll
            .wheel_target(delta_y, self.wheel_scroll_factor);
        self.scroll_to(target)
    }

    pub fn pointer_entered(&mut self) {
        self.scroll.pointer_entered();
    }

    pub fn pointer_left(&mut self) {
        self.scroll.pointer_left();
    }

    pub fn slider_pressed(&mut self) {
        self.scroll.slider_pressed();
    }

    pub fn slider_released(&mut self, pointer_inside: bool) {
        self.scroll.slider_released(pointer_inside);
    }

    /// The slider was dragged to `value`.
    pub fn slider_moved(&mut self, value: i32) -> bool {
        self.scroll_to(value)
    }
}
