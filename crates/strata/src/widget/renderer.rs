//! Viewport resolution: deciding which items are shown, and where.
//!
//! [`ViewportRenderer`] owns the visible set. Each pass diffs it against the
//! geometry at the current scroll offset:
//!
//! 1. place the footer
//! 2. keep visible rows that still intersect the viewport, retire the rest
//! 3. request items for rows that newly intersect
//! 4. keep or retire visible headers, applying the sticky-header rule
//! 5. request items for headers that newly qualify
//!
//! Intersection is half-open: a span `[y, y + h)` in viewport coordinates
//! is visible iff `y < viewport_height && y + h > 0`.

use std::collections::BTreeMap;

use strata_core::logging::{span_names, targets};
use strata_core::{PerfSpan, Rect, Size};

use super::item::ViewItem;
use super::item_store::{ItemKey, ItemRole, ItemStore};
use crate::config::TableStyle;
use crate::model::{GeometryModel, IndexPath, SelectionModel, StructuralChange, TableDataSource};

/// Everything one pass reads.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub geometry: &'a GeometryModel,
    pub selection: &'a SelectionModel,
    pub style: TableStyle,
    /// Scroll offset: the content coordinate shown at the viewport top.
    pub offset: i32,
    pub viewport: Size,
}

impl Frame<'_> {
    fn top(&self) -> i32 {
        self.offset
    }

    fn bottom(&self) -> i32 {
        self.offset + self.viewport.height
    }

    fn rect_at(&self, y: i32, height: i32) -> Rect {
        Rect::new(0, y, self.viewport.width, height)
    }

    /// Where a header is drawn, or `None` if it is not shown.
    ///
    /// In plain style the header of the section owning the first visible
    /// row sticks to the top until the section's end pushes it off.
    fn header_position(&self, section: usize, pinned: Option<usize>) -> Option<i32> {
        let span = self.geometry.header_span(section)?;
        if span.height == 0 {
            return None;
        }
        let natural = span.offset - self.offset;

        if self.style == TableStyle::Plain && pinned == Some(section) && natural < 0 {
            let end = self.geometry.section_end(section)?;
            let pushed = end - self.offset - span.height;
            if pushed > 0 {
                return Some(0);
            }
            if -pushed <= span.height {
                return Some(pushed);
            }
        }

        span.intersects(self.top(), self.bottom()).then_some(natural)
    }

    /// The section of the first row intersecting the viewport.
    fn pinned_section(&self) -> Option<usize> {
        let path = self.geometry.first_row_ending_after(self.top())?;
        let span = self.geometry.row_span(path)?;
        span.intersects(self.top(), self.bottom())
            .then_some(path.section)
    }
}

/// The visible set and the algorithm that maintains it.
#[derive(Debug, Default)]
pub struct ViewportRenderer {
    /// Visible rows in document order.
    rows: BTreeMap<IndexPath, ItemKey>,
    /// Visible headers by section; at most one per section.
    headers: BTreeMap<usize, ItemKey>,
    footer: Option<ItemKey>,
    /// Offset of the last completed pass.
    rendered_offset: Option<i32>,
}

impl ViewportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve the visible set for `frame`.
    ///
    /// `start` is where the row scan may begin; rows before it keep their
    /// current state. Unless `force` is set, a pass at the offset of the
    /// previous pass does nothing. Returns whether a pass ran.
    pub fn render<D: TableDataSource>(
        &mut self,
        frame: &Frame<'_>,
        source: &mut D,
        items: &mut ItemStore<D::Item>,
        start: Option<IndexPath>,
        force: bool,
    ) -> bool {
        if !force && self.rendered_offset == Some(frame.offset) {
            tracing::trace!(target: targets::RENDER, offset = frame.offset, "offset unchanged, skipping pass");
            return false;
        }
        let _span = PerfSpan::new(span_names::RENDER);

        self.place_footer(frame, items);
        self.retain_rows(frame, items);
        self.fill_rows(frame, source, items, start);

        let pinned = frame.pinned_section();
        self.retain_headers(frame, items, pinned);
        self.fill_headers(frame, source, items, pinned);

        self.rendered_offset = Some(frame.offset);
        tracing::trace!(
            target: targets::RENDER,
            offset = frame.offset,
            rows = self.rows.len(),
            headers = self.headers.len(),
            "pass complete"
        );
        true
    }

    fn place_footer<I: ViewItem>(&mut self, frame: &Frame<'_>, items: &mut ItemStore<I>) {
        let Some(key) = self.footer else {
            return;
        };
        let Some(item) = items.get_mut(key) else {
            return;
        };
        match frame.geometry.footer_span() {
            Some(span) => {
                item.set_geometry(frame.rect_at(span.offset - frame.offset, span.height));
                if span.intersects(frame.top(), frame.bottom()) {
                    item.show();
                } else {
                    item.hide();
                }
            }
            None => item.hide(),
        }
    }

    fn retain_rows<I: ViewItem>(&mut self, frame: &Frame<'_>, items: &mut ItemStore<I>) {
        self.rows.retain(|&path, &mut key| {
            let span = frame
                .geometry
                .row_span(path)
                .filter(|span| span.intersects(frame.top(), frame.bottom()));
            let kept = match (span, items.get_mut(key)) {
                (Some(span), Some(item)) => {
                    item.set_geometry(frame.rect_at(span.offset - frame.offset, span.height));
                    item.set_selected(frame.selection.is_selected(path));
                    item.show();
                    true
                }
                _ => false,
            };
            if !kept {
                items.retire(key, ItemRole::Cell);
            }
            kept
        });
    }

    fn fill_rows<D: TableDataSource>(
        &mut self,
        frame: &Frame<'_>,
        source: &mut D,
        items: &mut ItemStore<D::Item>,
        start: Option<IndexPath>,
    ) {
        let Some(first) = frame.geometry.first_row_ending_after(frame.top()) else {
            return;
        };
        let begin = start.map_or(first, |hint| hint.max(first));

        for section in begin.section..frame.geometry.section_count() {
            let rows = frame.geometry.row_count(section).unwrap_or(0);
            let first_row = if section == begin.section { begin.row } else { 0 };
            for row in first_row..rows {
                let path = IndexPath::new(section, row);
                let Some(span) = frame.geometry.row_span(path) else {
                    break;
                };
                // Offsets only grow from here on.
                if span.offset >= frame.bottom() {
                    return;
                }
                if !span.intersects(frame.top(), frame.bottom()) || self.rows.contains_key(&path) {
                    continue;
                }

                items.begin_request();
                let provided = source.row_item(items, path);
                items.finish_request(ItemRole::Cell, provided);
                let Some(key) = self.accept(provided, items) else {
                    tracing::trace!(target: targets::RENDER, %path, "no row item this pass");
                    continue;
                };
                if let Some(item) = items.get_mut(key) {
                    item.set_geometry(frame.rect_at(span.offset - frame.offset, span.height));
                    item.set_selected(frame.selection.is_selected(path));
                    item.show();
                }
                self.rows.insert(path, key);
            }
        }
    }

    fn retain_headers<I: ViewItem>(
        &mut self,
        frame: &Frame<'_>,
        items: &mut ItemStore<I>,
        pinned: Option<usize>,
    ) {
        self.headers.retain(|&section, &mut key| {
            let position = frame.header_position(section, pinned);
            let height = frame.geometry.header_span(section).map_or(0, |span| span.height);
            let kept = match (position, items.get_mut(key)) {
                (Some(y), Some(item)) => {
                    item.set_geometry(frame.rect_at(y, height));
                    item.show();
                    true
                }
                _ => false,
            };
            if kept {
                items.raise(key);
            } else {
                items.retire(key, ItemRole::Header);
            }
            kept
        });
    }

    fn fill_headers<D: TableDataSource>(
        &mut self,
        frame: &Frame<'_>,
        source: &mut D,
        items: &mut ItemStore<D::Item>,
        pinned: Option<usize>,
    ) {
        let first = frame.geometry.first_section_ending_after(frame.top());
        for section in first..frame.geometry.section_count() {
            let Some(span) = frame.geometry.header_span(section) else {
                break;
            };
            if span.offset >= frame.bottom() {
                break;
            }
            if self.headers.contains_key(&section) {
                continue;
            }
            let Some(y) = frame.header_position(section, pinned) else {
                continue;
            };

            items.begin_request();
            let provided = source.header_item(items, section);
            items.finish_request(ItemRole::Header, provided);
            let Some(key) = self.accept(provided, items) else {
                tracing::trace!(target: targets::RENDER, section, "no header item this pass");
                continue;
            };
            if let Some(item) = items.get_mut(key) {
                item.set_geometry(frame.rect_at(y, span.height));
                item.show();
            }
            items.raise(key);
            self.headers.insert(section, key);
        }
    }

    /// Validate an item handed back by the data source and take it out of
    /// the pools.
    fn accept<I: ViewItem>(&self, provided: Option<ItemKey>, items: &mut ItemStore<I>) -> Option<ItemKey> {
        let key = provided?;
        if !items.contains(key) {
            tracing::warn!(target: targets::RENDER, ?key, "data source returned an unknown item");
            return None;
        }
        if self.is_in_use(key) {
            tracing::warn!(target: targets::RENDER, ?key, "data source returned an item that is already shown");
            return None;
        }
        items.claim(key);
        Some(key)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Renumber the visible set after an insertion or deletion.
    ///
    /// Items whose row or section was removed are retired.
    pub fn apply_change<I: ViewItem>(&mut self, change: StructuralChange, items: &mut ItemStore<I>) {
        let rows = std::mem::take(&mut self.rows);
        for (path, key) in rows {
            match change.remap(path) {
                Some(new_path) => {
                    self.rows.insert(new_path, key);
                }
                None => items.retire(key, ItemRole::Cell),
            }
        }

        let headers = std::mem::take(&mut self.headers);
        for (section, key) in headers {
            match change.remap_section(section) {
                Some(new_section) => {
                    self.headers.insert(new_section, key);
                }
                None => items.retire(key, ItemRole::Header),
            }
        }
        self.invalidate();
    }

    /// Retire the item showing one row so the next pass asks for it again.
    pub fn retire_row<I: ViewItem>(&mut self, path: IndexPath, items: &mut ItemStore<I>) {
        if let Some(key) = self.rows.remove(&path) {
            items.retire(key, ItemRole::Cell);
        }
        self.invalidate();
    }

    /// Retire every visible row and header.
    pub fn retire_all<I: ViewItem>(&mut self, items: &mut ItemStore<I>) {
        for (_, key) in std::mem::take(&mut self.rows) {
            items.retire(key, ItemRole::Cell);
        }
        for (_, key) in std::mem::take(&mut self.headers) {
            items.retire(key, ItemRole::Header);
        }
        self.invalidate();
    }

    /// Forget the visible set without touching items; used when the store
    /// is about to be cleared.
    pub fn forget_visible(&mut self) {
        self.rows.clear();
        self.headers.clear();
        self.invalidate();
    }

    /// Make the next pass run even at an unchanged offset.
    pub fn invalidate(&mut self) {
        self.rendered_offset = None;
    }

    /// Replace the footer item. Returns the previous one.
    pub fn set_footer(&mut self, footer: Option<ItemKey>) -> Option<ItemKey> {
        self.invalidate();
        std::mem::replace(&mut self.footer, footer)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn footer(&self) -> Option<ItemKey> {
        self.footer
    }

    pub fn rendered_offset(&self) -> Option<i32> {
        self.rendered_offset
    }

    /// Visible rows in document order.
    pub fn visible_rows(&self) -> impl Iterator<Item = (IndexPath, ItemKey)> + '_ {
        self.rows.iter().map(|(&path, &key)| (path, key))
    }

    /// Visible headers in section order.
    pub fn visible_headers(&self) -> impl Iterator<Item = (usize, ItemKey)> + '_ {
        self.headers.iter().map(|(&section, &key)| (section, key))
    }

    pub fn row_item(&self, path: IndexPath) -> Option<ItemKey> {
        self.rows.get(&path).copied()
    }

    pub fn header_item(&self, section: usize) -> Option<ItemKey> {
        self.headers.get(&section).copied()
    }

    /// The path a visible row item is showing.
    pub fn index_path_for(&self, key: ItemKey) -> Option<IndexPath> {
        self.rows
            .iter()
            .find_map(|(&path, &k)| (k == key).then_some(path))
    }

    /// The section a visible header item is showing.
    pub fn section_for(&self, key: ItemKey) -> Option<usize> {
        self.headers
            .iter()
            .find_map(|(&section, &k)| (k == key).then_some(section))
    }

    /// Whether a key is currently a visible row, header or the footer.
    pub fn is_in_use(&self, key: ItemKey) -> bool {
        self.footer == Some(key)
            || self.rows.values().any(|&k| k == key)
            || self.headers.values().any(|&k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableMetrics;
    use crate::widget::ItemBase;

    struct Cell(ItemBase);

    impl ViewItem for Cell {
        fn item_base(&self) -> &ItemBase {
            &self.0
        }

        fn item_base_mut(&mut self) -> &mut ItemBase {
            &mut self.0
        }
    }

    /// Header 10 + three 20px rows, then an empty section with a 5px header.
    #[derive(Default)]
    struct Source {
        row_requests: Vec<IndexPath>,
        header_requests: Vec<usize>,
        decline: Option<IndexPath>,
    }

    impl TableMetrics for Source {
        fn section_count(&self) -> usize {
            2
        }

        fn row_count(&self, section: usize) -> usize {
            if section == 0 { 3 } else { 0 }
        }

        fn row_height(&self, _: IndexPath) -> i32 {
            20
        }

        fn header_height(&self, section: usize) -> i32 {
            if section == 0 { 10 } else { 5 }
        }
    }

    impl TableDataSource for Source {
        type Item = Cell;

        fn row_item(&mut self, items: &mut ItemStore<Cell>, path: IndexPath) -> Option<ItemKey> {
            self.row_requests.push(path);
            if self.decline == Some(path) {
                return None;
            }
            Some(
                items
                    .dequeue_reusable_cell("cell")
                    .unwrap_or_else(|| items.insert(Cell(ItemBase::new("cell")))),
            )
        }

        fn header_item(&mut self, items: &mut ItemStore<Cell>, section: usize) -> Option<ItemKey> {
            self.header_requests.push(section);
            Some(
                items
                    .dequeue_reusable_header("header")
                    .unwrap_or_else(|| items.insert(Cell(ItemBase::new("header")))),
            )
        }
    }

    struct Fixture {
        geometry: GeometryModel,
        selection: SelectionModel,
        source: Source,
        items: ItemStore<Cell>,
        renderer: ViewportRenderer,
    }

    impl Fixture {
        fn new() -> Self {
            let source = Source::default();
            let mut geometry = GeometryModel::new();
            geometry.rebuild(&source).unwrap();
            Self {
                geometry,
                selection: SelectionModel::new(),
                source,
                items: ItemStore::new(),
                renderer: ViewportRenderer::new(),
            }
        }

        fn render(&mut self, offset: i32, height: i32, force: bool) -> bool {
            let frame = Frame {
                geometry: &self.geometry,
                selection: &self.selection,
                style: TableStyle::Plain,
                offset,
                viewport: Size::new(100, height),
            };
            self.renderer
                .render(&frame, &mut self.source, &mut self.items, None, force)
        }

        fn visible_paths(&self) -> Vec<IndexPath> {
            self.renderer.visible_rows().map(|(path, _)| path).collect()
        }

        fn header_y(&self, section: usize) -> Option<i32> {
            let key = self.renderer.header_item(section)?;
            Some(self.items.get(key)?.geometry().top())
        }
    }

    #[test]
    fn test_initial_pass() {
        let mut fixture = Fixture::new();
        assert!(fixture.render(0, 40, false));

        assert_eq!(
            fixture.visible_paths(),
            vec![IndexPath::new(0, 0), IndexPath::new(0, 1)]
        );
        assert_eq!(fixture.header_y(0), Some(0));
        assert_eq!(fixture.header_y(1), None);

        let key = fixture.renderer.row_item(IndexPath::new(0, 1)).unwrap();
        assert_eq!(fixture.items.get(key).unwrap().geometry(), Rect::new(0, 30, 100, 20));
    }

    #[test]
    fn test_same_offset_is_skipped() {
        let mut fixture = Fixture::new();
        fixture.render(0, 40, false);
        let requests = fixture.source.row_requests.len();

        assert!(!fixture.render(0, 40, false));
        assert!(fixture.render(0, 40, true));
        assert_eq!(fixture.source.row_requests.len(), requests);
    }

    #[test]
    fn test_scrolled_out_rows_are_recycled() {
        let mut fixture = Fixture::new();
        fixture.render(0, 40, false);
        let first = fixture.renderer.row_item(IndexPath::new(0, 0)).unwrap();

        fixture.render(35, 40, false);
        assert_eq!(
            fixture.visible_paths(),
            vec![IndexPath::new(0, 1), IndexPath::new(0, 2)]
        );
        // Row (0, 2) reused the item that showed (0, 0).
        assert_eq!(fixture.renderer.row_item(IndexPath::new(0, 2)), Some(first));
        assert!(!fixture.items.get(first).unwrap().is_hidden());
        assert!(fixture.items.pool(ItemRole::Cell).is_empty());
    }

    #[test]
    fn test_sticky_header_pins_and_slides() {
        let mut fixture = Fixture::new();

        // Header 0 naturally at -5, section 0 ends at 70: pinned at 0.
        fixture.render(5, 40, false);
        assert_eq!(fixture.header_y(0), Some(0));

        // Section end 70 - 55 - 10 = 5 > 0: still pinned.
        fixture.render(55, 40, false);
        assert_eq!(fixture.header_y(0), Some(0));

        // 70 - 65 - 10 = -5: pushed up by the next section.
        fixture.render(65, 40, false);
        assert_eq!(fixture.header_y(0), Some(-5));
        assert_eq!(fixture.header_y(1), Some(5));
    }

    #[test]
    fn test_group_style_headers_scroll() {
        let mut fixture = Fixture::new();
        let frame = Frame {
            geometry: &fixture.geometry,
            selection: &fixture.selection,
            style: TableStyle::Group,
            offset: 15,
            viewport: Size::new(100, 40),
        };
        fixture
            .renderer
            .render(&frame, &mut fixture.source, &mut fixture.items, None, false);

        assert_eq!(fixture.renderer.header_item(0), None);
    }

    #[test]
    fn test_declined_item_is_retried() {
        let mut fixture = Fixture::new();
        fixture.source.decline = Some(IndexPath::new(0, 1));
        fixture.render(0, 40, false);
        assert_eq!(fixture.visible_paths(), vec![IndexPath::new(0, 0)]);

        fixture.source.decline = None;
        fixture.render(0, 40, true);
        assert_eq!(
            fixture.visible_paths(),
            vec![IndexPath::new(0, 0), IndexPath::new(0, 1)]
        );
    }

    #[test]
    fn test_apply_change_renumbers() {
        let mut fixture = Fixture::new();
        fixture.render(0, 40, false);
        let second = fixture.renderer.row_item(IndexPath::new(0, 1)).unwrap();

        fixture
            .renderer
            .apply_change(StructuralChange::RowDeleted(IndexPath::new(0, 0)), &mut fixture.items);

        assert_eq!(fixture.visible_paths(), vec![IndexPath::new(0, 0)]);
        assert_eq!(fixture.renderer.row_item(IndexPath::new(0, 0)), Some(second));
        assert_eq!(fixture.items.pool(ItemRole::Cell).len(), 1);
        assert_eq!(fixture.renderer.rendered_offset(), None);
    }

    #[test]
    fn test_index_path_lookup() {
        let mut fixture = Fixture::new();
        fixture.render(0, 40, false);
        let key = fixture.renderer.row_item(IndexPath::new(0, 1)).unwrap();

        assert_eq!(fixture.renderer.index_path_for(key), Some(IndexPath::new(0, 1)));
        assert!(fixture.renderer.is_in_use(key));

        fixture.renderer.retire_all(&mut fixture.items);
        assert_eq!(fixture.renderer.index_path_for(key), None);
        assert!(fixture.items.get(key).unwrap().is_hidden());
    }
}
