//! The host surface: what the engine needs from a visual item.
//!
//! A host implements [`ViewItem`] for its row/header type by embedding an
//! [`ItemBase`] and exposing it. Everything else has default implementations
//! that go through the base, in the same way widgets delegate to their base
//! state.
//!
//! ```ignore
//! struct ContactCell {
//!     base: ItemBase,
//!     name: String,
//! }
//!
//! impl ViewItem for ContactCell {
//!     fn item_base(&self) -> &ItemBase {
//!         &self.base
//!     }
//!
//!     fn item_base_mut(&mut self) -> &mut ItemBase {
//!         &mut self.base
//!     }
//! }
//! ```

use strata_core::{Point, Rect};

/// How a selected item is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionStyle {
    /// Selection never changes the item's appearance.
    None,
    Blue,
    #[default]
    Gray,
    /// The host's default highlight.
    Default,
}

/// State shared by every visual item.
#[derive(Debug, Clone)]
pub struct ItemBase {
    identifier: String,
    geometry: Rect,
    hidden: bool,
    selected: bool,
    selection_style: SelectionStyle,
    z_order: u64,
    needs_repaint: bool,
}

impl ItemBase {
    /// Create the base for an item recycled under `identifier`.
    ///
    /// Items start hidden; the engine shows them once placed.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            geometry: Rect::ZERO,
            hidden: true,
            selected: false,
            selection_style: SelectionStyle::default(),
            z_order: 0,
            needs_repaint: true,
        }
    }

    /// Set the selection style at construction.
    pub fn with_selection_style(mut self, style: SelectionStyle) -> Self {
        self.selection_style = style;
        self
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Position and size in viewport coordinates.
    #[inline]
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    pub fn set_geometry(&mut self, rect: Rect) {
        if self.geometry != rect {
            self.geometry = rect;
            self.needs_repaint = true;
        }
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        if self.hidden != hidden {
            self.hidden = hidden;
            self.needs_repaint = true;
        }
    }

    #[inline]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Returns `true` if the highlighted appearance changed.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        let was_highlighted = self.is_highlighted();
        self.selected = selected;
        let changed = was_highlighted != self.is_highlighted();
        if changed {
            self.needs_repaint = true;
        }
        changed
    }

    #[inline]
    pub fn selection_style(&self) -> SelectionStyle {
        self.selection_style
    }

    pub fn set_selection_style(&mut self, style: SelectionStyle) {
        if self.selection_style != style {
            self.selection_style = style;
            self.needs_repaint = true;
        }
    }

    /// Selected and styled to show it.
    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.selected && self.selection_style != SelectionStyle::None
    }

    /// Stacking order; higher is drawn on top.
    #[inline]
    pub fn z_order(&self) -> u64 {
        self.z_order
    }

    pub(crate) fn set_z_order(&mut self, z_order: u64) {
        self.z_order = z_order;
    }

    /// Whether anything visible changed since the last call.
    pub fn take_needs_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }
}

/// A visual item the engine can place, show, hide and recycle.
pub trait ViewItem {
    // =========================================================================
    // Required Methods
    // =========================================================================

    fn item_base(&self) -> &ItemBase;

    fn item_base_mut(&mut self) -> &mut ItemBase;

    // =========================================================================
    // Hooks
    // =========================================================================

    /// Called after the item's highlighted appearance changed.
    fn highlight_changed(&mut self, _highlighted: bool) {}

    // =========================================================================
    // Provided Methods
    // =========================================================================

    /// The identifier this item is pooled under.
    fn reuse_identifier(&self) -> &str {
        self.item_base().identifier()
    }

    fn geometry(&self) -> Rect {
        self.item_base().geometry()
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.item_base_mut().set_geometry(rect);
    }

    fn is_hidden(&self) -> bool {
        self.item_base().is_hidden()
    }

    fn show(&mut self) {
        self.item_base_mut().set_hidden(false);
    }

    fn hide(&mut self) {
        self.item_base_mut().set_hidden(true);
    }

    fn is_selected(&self) -> bool {
        self.item_base().is_selected()
    }

    /// Stamp the selection state, notifying the hook if the appearance changed.
    fn set_selected(&mut self, selected: bool) {
        if self.item_base_mut().set_selected(selected) {
            let highlighted = self.item_base().is_highlighted();
            self.highlight_changed(highlighted);
        }
    }

    fn selection_style(&self) -> SelectionStyle {
        self.item_base().selection_style()
    }

    fn set_selection_style(&mut self, style: SelectionStyle) {
        self.item_base_mut().set_selection_style(style);
    }

    fn is_highlighted(&self) -> bool {
        self.item_base().is_highlighted()
    }

    /// Hit-test a point in viewport coordinates.
    fn contains(&self, point: Point) -> bool {
        !self.is_hidden() && self.geometry().contains(point)
    }
}
