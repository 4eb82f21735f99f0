//! Vertical layout bookkeeping.
//!
//! [`GeometryModel`] stores, per section, a header offset and height and the
//! offsets and heights of every row. Offsets are content coordinates measured
//! from the top of the first header.
//!
//! The model always satisfies:
//!
//! - `row_offset[i + 1] == row_offset[i] + row_height[i]` within a section
//! - a section's first row starts at `header_offset + header_height`
//! - a section's header starts where the previous section ends
//! - content height is the end of the last section plus the footer height
//!
//! Incremental operations only touch the suffix that moves.

use strata_core::PerfSpan;
use strata_core::logging::{span_names, targets};

use super::index_path::IndexPath;
use super::source::TableMetrics;
use crate::error::{Result, TableError};

/// A vertical extent in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub offset: i32,
    pub height: i32,
}

impl Span {
    #[inline]
    pub const fn new(offset: i32, height: i32) -> Self {
        Self { offset, height }
    }

    /// One past the last covered coordinate.
    #[inline]
    pub fn end(&self) -> i32 {
        self.offset.saturating_add(self.height)
    }

    /// Whether the span overlaps the half-open range `[top, bottom)`.
    #[inline]
    pub fn intersects(&self, top: i32, bottom: i32) -> bool {
        self.offset < bottom && self.end() > top
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SectionGeometry {
    header_offset: i32,
    header_height: i32,
    row_offsets: Vec<i32>,
    row_heights: Vec<i32>,
}

impl SectionGeometry {
    fn build<M: TableMetrics + ?Sized>(source: &M, section: usize, start: i32) -> Result<Self> {
        let header_height = checked_height("header", source.header_height(section))?;
        let rows = source.row_count(section);

        let mut row_offsets = Vec::with_capacity(rows);
        let mut row_heights = Vec::with_capacity(rows);
        let mut y = extend("header", start, header_height)?;
        for row in 0..rows {
            let height = checked_height("row", source.row_height(IndexPath::new(section, row)))?;
            row_offsets.push(y);
            row_heights.push(height);
            y = extend("row", y, height)?;
        }

        Ok(Self {
            header_offset: start,
            header_height,
            row_offsets,
            row_heights,
        })
    }

    fn rows_start(&self) -> i32 {
        self.header_offset + self.header_height
    }

    fn end(&self) -> i32 {
        match (self.row_offsets.last(), self.row_heights.last()) {
            (Some(offset), Some(height)) => offset + height,
            _ => self.rows_start(),
        }
    }

    fn height(&self) -> i32 {
        self.end() - self.header_offset
    }

    fn row_count(&self) -> usize {
        self.row_offsets.len()
    }

    fn shift(&mut self, delta: i32) {
        self.header_offset += delta;
        self.shift_rows_from(0, delta);
    }

    fn shift_rows_from(&mut self, row: usize, delta: i32) {
        for offset in &mut self.row_offsets[row..] {
            *offset += delta;
        }
    }
}

fn checked_height(what: &'static str, height: i32) -> Result<i32> {
    if height < 0 {
        tracing::warn!(target: targets::GEOMETRY, what, height, "data source returned negative height");
        return Err(TableError::NegativeHeight { what, height });
    }
    Ok(height)
}

/// `base + height`, or an error if the sum does not fit an offset.
fn extend(what: &'static str, base: i32, height: i32) -> Result<i32> {
    base.checked_add(height).ok_or_else(|| {
        tracing::warn!(target: targets::GEOMETRY, what, base, height, "content height overflow");
        TableError::ContentTooTall { what, height }
    })
}

/// Offsets and heights of every header and row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryModel {
    sections: Vec<SectionGeometry>,
    /// `None` when the table has no footer.
    footer_height: Option<i32>,
}

impl GeometryModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Number of rows in `section`, or `None` if there is no such section.
    pub fn row_count(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(SectionGeometry::row_count)
    }

    /// Whether `index_path` addresses an existing row.
    pub fn contains(&self, index_path: IndexPath) -> bool {
        self.row_count(index_path.section)
            .is_some_and(|rows| index_path.row < rows)
    }

    /// The extent of one row.
    pub fn row_span(&self, index_path: IndexPath) -> Option<Span> {
        let section = self.sections.get(index_path.section)?;
        let offset = *section.row_offsets.get(index_path.row)?;
        let height = *section.row_heights.get(index_path.row)?;
        Some(Span::new(offset, height))
    }

    /// The extent of a section's header.
    pub fn header_span(&self, section: usize) -> Option<Span> {
        self.sections
            .get(section)
            .map(|s| Span::new(s.header_offset, s.header_height))
    }

    /// Where a section ends: the bottom of its last row, or of its header if
    /// it has no rows.
    pub fn section_end(&self, section: usize) -> Option<i32> {
        self.sections.get(section).map(SectionGeometry::end)
    }

    /// Row offsets of one section, in row order.
    pub fn row_offsets(&self, section: usize) -> Option<&[i32]> {
        self.sections.get(section).map(|s| s.row_offsets.as_slice())
    }

    /// Row heights of one section, in row order.
    pub fn row_heights(&self, section: usize) -> Option<&[i32]> {
        self.sections.get(section).map(|s| s.row_heights.as_slice())
    }

    /// The end of the last section, where the footer starts.
    pub fn rows_end(&self) -> i32 {
        self.sections.last().map_or(0, SectionGeometry::end)
    }

    pub fn footer_height(&self) -> Option<i32> {
        self.footer_height
    }

    /// The footer's extent, if there is a footer.
    pub fn footer_span(&self) -> Option<Span> {
        self.footer_height
            .map(|height| Span::new(self.rows_end(), height))
    }

    /// Total layout extent, footer included.
    pub fn content_height(&self) -> i32 {
        self.rows_end() + self.footer_height.unwrap_or(0)
    }

    /// The first section that ends below `top`.
    ///
    /// Equal to `section_count()` if every section ends at or above `top`.
    pub fn first_section_ending_after(&self, top: i32) -> usize {
        self.sections.partition_point(|s| s.end() <= top)
    }

    /// The first row, in document order, whose bottom lies below `top`.
    ///
    /// Rows before it cannot intersect a viewport whose top is `top`.
    pub fn first_row_ending_after(&self, top: i32) -> Option<IndexPath> {
        let mut section = self.first_section_ending_after(top);
        while let Some(geometry) = self.sections.get(section) {
            if geometry.row_offsets.is_empty() {
                section += 1;
                continue;
            }
            // A row ends where the next one starts; the last row ends with
            // the section, which is below `top`.
            let row = geometry.row_offsets[1..].partition_point(|&offset| offset <= top);
            return Some(IndexPath::new(section, row));
        }
        None
    }

    /// Check every offset against the running sum of heights.
    pub fn is_consistent(&self) -> bool {
        let mut y = 0;
        for section in &self.sections {
            if section.header_offset != y || section.header_height < 0 {
                return false;
            }
            y += section.header_height;
            if section.row_offsets.len() != section.row_heights.len() {
                return false;
            }
            for (&offset, &height) in section.row_offsets.iter().zip(&section.row_heights) {
                if offset != y || height < 0 {
                    return false;
                }
                y += height;
            }
        }
        y == self.rows_end()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Recompute everything from the data source.
    ///
    /// The footer height is kept.
    pub fn rebuild<M: TableMetrics + ?Sized>(&mut self, source: &M) -> Result<()> {
        let _span = PerfSpan::new(span_names::REBUILD);

        let count = source.section_count();
        let mut sections = Vec::with_capacity(count);
        let mut y = 0;
        for section in 0..count {
            let geometry = SectionGeometry::build(source, section, y)?;
            y = geometry.end();
            sections.push(geometry);
        }
        extend("footer", y, self.footer_height.unwrap_or(0))?;
        self.sections = sections;

        tracing::debug!(
            target: targets::GEOMETRY,
            sections = count,
            content_height = self.content_height(),
            "geometry rebuilt"
        );
        Ok(())
    }

    /// Drop all sections. The footer height is kept.
    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// Set or remove the footer height.
    pub fn set_footer_height(&mut self, height: Option<i32>) -> Result<()> {
        if let Some(height) = height {
            checked_height("footer", height)?;
            extend("footer", self.rows_end(), height)?;
        }
        self.footer_height = height;
        Ok(())
    }

    pub fn clear_footer(&mut self) {
        self.footer_height = None;
    }

    /// Insert the geometry of a section the data source already reports.
    ///
    /// `section` must be at most the current section count and less than the
    /// data source's section count. Returns the inserted height, by which
    /// every later offset moved.
    pub fn insert_section<M: TableMetrics + ?Sized>(
        &mut self,
        source: &M,
        section: usize,
    ) -> Result<i32> {
        let current = self.sections.len();
        if section > current {
            return Err(TableError::section_out_of_range(section, current + 1));
        }
        let reported = source.section_count();
        if section >= reported {
            return Err(TableError::section_out_of_range(section, reported));
        }

        let start = match section {
            0 => 0,
            _ => self.sections[section - 1].end(),
        };
        let geometry = SectionGeometry::build(source, section, start)?;
        let delta = geometry.height();
        extend("section", self.content_height(), delta)?;

        for later in &mut self.sections[section..] {
            later.shift(delta);
        }
        self.sections.insert(section, geometry);

        tracing::debug!(target: targets::GEOMETRY, section, delta, "section inserted");
        Ok(delta)
    }

    /// Remove a section's geometry. Returns the removed height.
    pub fn delete_section(&mut self, section: usize) -> Result<i32> {
        let current = self.sections.len();
        if section >= current {
            return Err(TableError::section_out_of_range(section, current));
        }

        let removed = self.sections.remove(section);
        let delta = removed.height();
        for later in &mut self.sections[section..] {
            later.shift(-delta);
        }

        tracing::debug!(target: targets::GEOMETRY, section, delta = -delta, "section deleted");
        Ok(delta)
    }

    /// Insert one row the data source already reports.
    ///
    /// The row may be inserted before an existing row or appended one past
    /// the end of its section. Returns the new row's height, by which every
    /// later offset moved.
    pub fn insert_row<M: TableMetrics + ?Sized>(
        &mut self,
        source: &M,
        index_path: IndexPath,
    ) -> Result<i32> {
        let section_count = self.sections.len();
        let geometry = self
            .sections
            .get(index_path.section)
            .ok_or_else(|| TableError::section_out_of_range(index_path.section, section_count))?;
        let existing = geometry.row_count();
        if index_path.row > existing {
            return Err(TableError::row_out_of_range(index_path, existing + 1));
        }
        let reported = source.row_count(index_path.section);
        if index_path.row >= reported {
            return Err(TableError::row_out_of_range(index_path, reported));
        }
        let height = checked_height("row", source.row_height(index_path))?;
        extend("row", self.content_height(), height)?;

        let geometry = &mut self.sections[index_path.section];
        let offset = geometry
            .row_offsets
            .get(index_path.row)
            .copied()
            .unwrap_or_else(|| geometry.end());
        geometry.row_offsets.insert(index_path.row, offset);
        geometry.row_heights.insert(index_path.row, height);
        geometry.shift_rows_from(index_path.row + 1, height);
        self.shift_sections_after(index_path.section, height);

        tracing::debug!(target: targets::GEOMETRY, %index_path, height, "row inserted");
        Ok(height)
    }

    /// Re-query one row's height. Returns the height delta.
    ///
    /// A zero delta leaves every offset untouched.
    pub fn reload_row<M: TableMetrics + ?Sized>(
        &mut self,
        source: &M,
        index_path: IndexPath,
    ) -> Result<i32> {
        self.check_row(index_path)?;
        let reported = source.row_count(index_path.section);
        if index_path.row >= reported {
            return Err(TableError::row_out_of_range(index_path, reported));
        }
        let height = checked_height("row", source.row_height(index_path))?;

        let delta = height - self.sections[index_path.section].row_heights[index_path.row];
        if delta == 0 {
            return Ok(0);
        }
        extend("row", self.content_height(), delta)?;

        let geometry = &mut self.sections[index_path.section];
        geometry.row_heights[index_path.row] = height;
        geometry.shift_rows_from(index_path.row + 1, delta);
        self.shift_sections_after(index_path.section, delta);

        tracing::debug!(target: targets::GEOMETRY, %index_path, delta, "row reloaded");
        Ok(delta)
    }

    /// Remove one row. Returns the removed height.
    pub fn delete_row(&mut self, index_path: IndexPath) -> Result<i32> {
        self.check_row(index_path)?;

        let geometry = &mut self.sections[index_path.section];
        geometry.row_offsets.remove(index_path.row);
        let height = geometry.row_heights.remove(index_path.row);
        geometry.shift_rows_from(index_path.row, -height);
        self.shift_sections_after(index_path.section, -height);

        tracing::debug!(target: targets::GEOMETRY, %index_path, height, "row deleted");
        Ok(height)
    }

    pub(crate) fn check_row(&self, index_path: IndexPath) -> Result<()> {
        let rows = self.row_count(index_path.section).ok_or_else(|| {
            TableError::section_out_of_range(index_path.section, self.sections.len())
        })?;
        if index_path.row >= rows {
            return Err(TableError::row_out_of_range(index_path, rows));
        }
        Ok(())
    }

    fn shift_sections_after(&mut self, section: usize, delta: i32) {
        for later in &mut self.sections[section + 1..] {
            later.shift(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        headers: Vec<i32>,
        rows: Vec<Vec<i32>>,
    }

    impl TableMetrics for Fixed {
        fn section_count(&self) -> usize {
            self.rows.len()
        }

        fn row_count(&self, section: usize) -> usize {
            self.rows[section].len()
        }

        fn row_height(&self, index_path: IndexPath) -> i32 {
            self.rows[index_path.section][index_path.row]
        }

        fn header_height(&self, section: usize) -> i32 {
            self.headers[section]
        }
    }

    fn two_sections() -> Fixed {
        Fixed {
            headers: vec![10, 5],
            rows: vec![vec![20, 20, 20], vec![]],
        }
    }

    fn built(source: &Fixed) -> GeometryModel {
        let mut model = GeometryModel::new();
        model.rebuild(source).unwrap();
        model
    }

    #[test]
    fn test_rebuild_offsets() {
        let model = built(&two_sections());

        assert_eq!(model.header_span(0), Some(Span::new(0, 10)));
        assert_eq!(model.row_offsets(0), Some(&[10, 30, 50][..]));
        assert_eq!(model.header_span(1), Some(Span::new(70, 5)));
        assert_eq!(model.section_end(1), Some(75));
        assert_eq!(model.content_height(), 75);
        assert!(model.is_consistent());
    }

    #[test]
    fn test_insert_row_shifts_suffix() {
        let mut source = two_sections();
        let mut model = built(&source);

        source.rows[0].insert(1, 15);
        assert_eq!(model.insert_row(&source, IndexPath::new(0, 1)).unwrap(), 15);

        assert_eq!(model.row_offsets(0), Some(&[10, 30, 45, 65][..]));
        assert_eq!(model.header_span(1), Some(Span::new(85, 5)));
        assert_eq!(model.content_height(), 90);
        assert!(model.is_consistent());
    }

    #[test]
    fn test_insert_row_appends_to_empty_section() {
        let mut source = two_sections();
        let mut model = built(&source);

        source.rows[1].push(25);
        model.insert_row(&source, IndexPath::new(1, 0)).unwrap();

        assert_eq!(model.row_span(IndexPath::new(1, 0)), Some(Span::new(75, 25)));
        assert_eq!(model.content_height(), 100);
        assert!(model.is_consistent());
    }

    #[test]
    fn test_insert_row_rejects_out_of_range() {
        let source = two_sections();
        let mut model = built(&source);
        let before = model.clone();

        // Not yet reported by the data source.
        let err = model.insert_row(&source, IndexPath::new(0, 3)).unwrap_err();
        assert!(matches!(err, TableError::RowOutOfRange { .. }));

        // More than one past the end.
        let err = model.insert_row(&source, IndexPath::new(0, 5)).unwrap_err();
        assert!(matches!(err, TableError::RowOutOfRange { count: 4, .. }));

        let err = model.insert_row(&source, IndexPath::new(2, 0)).unwrap_err();
        assert!(matches!(err, TableError::SectionOutOfRange { section: 2, .. }));

        assert_eq!(model, before);
    }

    #[test]
    fn test_reload_row_applies_delta() {
        let mut source = two_sections();
        let mut model = built(&source);

        source.rows[0][0] = 35;
        assert_eq!(model.reload_row(&source, IndexPath::new(0, 0)).unwrap(), 15);
        assert_eq!(model.row_offsets(0), Some(&[10, 45, 65][..]));
        assert_eq!(model.header_span(1), Some(Span::new(85, 5)));
        assert_eq!(model.content_height(), 90);

        let before = model.clone();
        assert_eq!(model.reload_row(&source, IndexPath::new(0, 0)).unwrap(), 0);
        assert_eq!(model, before);
    }

    #[test]
    fn test_delete_row_mirrors_insert() {
        let mut source = two_sections();
        let mut model = built(&source);
        let original = model.clone();

        source.rows[0].insert(1, 15);
        model.insert_row(&source, IndexPath::new(0, 1)).unwrap();
        assert_eq!(model.delete_row(IndexPath::new(0, 1)).unwrap(), 15);

        assert_eq!(model, original);
    }

    #[test]
    fn test_insert_and_delete_section() {
        let mut source = two_sections();
        let mut model = built(&source);

        source.headers.insert(1, 8);
        source.rows.insert(1, vec![12, 12]);
        assert_eq!(model.insert_section(&source, 1).unwrap(), 32);

        assert_eq!(model.header_span(1), Some(Span::new(70, 8)));
        assert_eq!(model.row_offsets(1), Some(&[78, 90][..]));
        assert_eq!(model.header_span(2), Some(Span::new(102, 5)));
        assert_eq!(model.content_height(), 107);
        assert!(model.is_consistent());

        assert_eq!(model.delete_section(1).unwrap(), 32);
        assert_eq!(model.header_span(1), Some(Span::new(70, 5)));
        assert_eq!(model.content_height(), 75);
        assert!(model.is_consistent());

        assert!(model.delete_section(2).is_err());
    }

    #[test]
    fn test_insert_first_section() {
        let mut source = two_sections();
        let mut model = built(&source);

        source.headers.insert(0, 4);
        source.rows.insert(0, vec![6]);
        model.insert_section(&source, 0).unwrap();

        assert_eq!(model.header_span(0), Some(Span::new(0, 4)));
        assert_eq!(model.header_span(1), Some(Span::new(10, 10)));
        assert_eq!(model.row_offsets(1), Some(&[20, 40, 60][..]));
        assert!(model.is_consistent());
    }

    #[test]
    fn test_footer_sits_at_content_end() {
        let mut source = two_sections();
        let mut model = built(&source);

        model.set_footer_height(Some(30)).unwrap();
        assert_eq!(model.footer_span(), Some(Span::new(75, 30)));
        assert_eq!(model.content_height(), 105);

        source.rows[0].push(20);
        model.insert_row(&source, IndexPath::new(0, 3)).unwrap();
        assert_eq!(model.footer_span(), Some(Span::new(95, 30)));
        assert_eq!(model.content_height(), 125);

        assert!(model.set_footer_height(Some(-1)).is_err());
        model.set_footer_height(None).unwrap();
        assert_eq!(model.footer_span(), None);
        assert_eq!(model.content_height(), 95);
    }

    #[test]
    fn test_negative_height_aborts_rebuild() {
        let source = Fixed {
            headers: vec![0],
            rows: vec![vec![10, -4]],
        };
        let mut model = built(&two_sections());
        let before = model.clone();

        let err = model.rebuild(&source).unwrap_err();
        assert!(matches!(err, TableError::NegativeHeight { what: "row", height: -4 }));
        assert_eq!(model, before);
    }

    #[test]
    fn test_overflowing_heights_abort_rebuild() {
        let huge = i32::MAX / 2;
        let source = Fixed {
            headers: vec![0],
            rows: vec![vec![huge, huge, huge]],
        };
        let mut model = built(&two_sections());
        let before = model.clone();

        let err = model.rebuild(&source).unwrap_err();
        assert!(matches!(err, TableError::ContentTooTall { what: "row", .. }));
        assert_eq!(model, before);
    }

    #[test]
    fn test_overflowing_mutations_leave_model_unchanged() {
        let huge = i32::MAX / 2;
        let mut source = Fixed {
            headers: vec![0],
            rows: vec![vec![huge, huge]],
        };
        let mut model = built(&source);
        let before = model.clone();

        source.rows[0].push(huge);
        let err = model.insert_row(&source, IndexPath::new(0, 2)).unwrap_err();
        assert!(matches!(err, TableError::ContentTooTall { .. }));
        assert_eq!(model, before);

        source.rows[0].pop();
        source.rows[0][1] = i32::MAX;
        let err = model.reload_row(&source, IndexPath::new(0, 1)).unwrap_err();
        assert!(matches!(err, TableError::ContentTooTall { .. }));
        assert_eq!(model, before);

        source.rows[0][1] = huge;
        source.headers.push(huge);
        source.rows.push(vec![]);
        let err = model.insert_section(&source, 1).unwrap_err();
        assert!(matches!(err, TableError::ContentTooTall { .. }));
        assert_eq!(model, before);

        assert!(model.set_footer_height(Some(huge)).is_err());
        assert_eq!(model.footer_height(), None);
        assert_eq!(model.content_height(), 2 * huge);
    }

    #[test]
    fn test_first_row_ending_after() {
        let model = built(&two_sections());

        assert_eq!(model.first_row_ending_after(0), Some(IndexPath::new(0, 0)));
        assert_eq!(model.first_row_ending_after(29), Some(IndexPath::new(0, 0)));
        assert_eq!(model.first_row_ending_after(30), Some(IndexPath::new(0, 1)));
        assert_eq!(model.first_row_ending_after(69), Some(IndexPath::new(0, 2)));
        assert_eq!(model.first_row_ending_after(70), None);
    }

    #[test]
    fn test_first_row_skips_empty_sections() {
        let source = Fixed {
            headers: vec![10, 10, 10],
            rows: vec![vec![10], vec![], vec![10, 10]],
        };
        let model = built(&source);

        assert_eq!(model.first_row_ending_after(25), Some(IndexPath::new(2, 0)));
        assert_eq!(model.first_row_ending_after(50), Some(IndexPath::new(2, 1)));
    }
}
