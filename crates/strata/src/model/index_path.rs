//! Row addressing.
//!
//! An [`IndexPath`] names one row by section and row. Paths are totally
//! ordered in document order (section first, then row), which is what every
//! "shift everything after X" operation relies on.
//!
//! [`StructuralChange`] describes an insertion or deletion so that anything
//! keyed by index path (visible items, selection) can follow the data.

use std::fmt;

/// The address of a row: its section and its row within that section.
///
/// Absence is expressed as `Option<IndexPath>`; there is no sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IndexPath {
    /// Section index.
    pub section: usize,
    /// Row index within the section.
    pub row: usize,
}

impl IndexPath {
    /// Create a new index path.
    #[inline]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }

    /// The first row of the first section.
    pub const ZERO: Self = Self::new(0, 0);
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.section, self.row)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, row): (usize, usize)) -> Self {
        Self::new(section, row)
    }
}

/// An insertion or removal that renumbers index paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralChange {
    /// A section was inserted at this index.
    SectionInserted(usize),
    /// The section at this index was removed.
    SectionDeleted(usize),
    /// A row was inserted at this path.
    RowInserted(IndexPath),
    /// The row at this path was removed.
    RowDeleted(IndexPath),
}

impl StructuralChange {
    /// Where a path that existed before the change lives after it.
    ///
    /// Returns `None` if the change removed the path.
    pub fn remap(&self, path: IndexPath) -> Option<IndexPath> {
        match *self {
            Self::SectionInserted(section) => Some(if path.section >= section {
                IndexPath::new(path.section + 1, path.row)
            } else {
                path
            }),
            Self::SectionDeleted(section) => match path.section.cmp(&section) {
                std::cmp::Ordering::Less => Some(path),
                std::cmp::Ordering::Equal => None,
                std::cmp::Ordering::Greater => Some(IndexPath::new(path.section - 1, path.row)),
            },
            Self::RowInserted(at) => Some(if path.section == at.section && path.row >= at.row {
                IndexPath::new(path.section, path.row + 1)
            } else {
                path
            }),
            Self::RowDeleted(at) => {
                if path.section != at.section || path.row < at.row {
                    Some(path)
                } else if path.row == at.row {
                    None
                } else {
                    Some(IndexPath::new(path.section, path.row - 1))
                }
            }
        }
    }

    /// Where a section index that existed before the change lives after it.
    ///
    /// Row changes never renumber sections.
    pub fn remap_section(&self, section: usize) -> Option<usize> {
        match *self {
            Self::SectionInserted(at) if section >= at => Some(section + 1),
            Self::SectionDeleted(at) if section == at => None,
            Self::SectionDeleted(at) if section > at => Some(section - 1),
            _ => Some(section),
        }
    }
}

static_assertions::assert_impl_all!(IndexPath: Copy, Ord, std::hash::Hash, Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_section_then_row() {
        let mut paths = vec![
            IndexPath::new(1, 0),
            IndexPath::new(0, 5),
            IndexPath::new(0, 1),
            IndexPath::new(2, 0),
            IndexPath::new(1, 3),
        ];
        paths.sort();
        assert_eq!(
            paths,
            vec![
                IndexPath::new(0, 1),
                IndexPath::new(0, 5),
                IndexPath::new(1, 0),
                IndexPath::new(1, 3),
                IndexPath::new(2, 0),
            ]
        );
        assert!(IndexPath::new(0, 100) < IndexPath::new(1, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(IndexPath::new(3, 14).to_string(), "(3, 14)");
    }

    #[test]
    fn test_row_inserted_shifts_later_rows_in_section() {
        let change = StructuralChange::RowInserted(IndexPath::new(0, 1));
        assert_eq!(change.remap(IndexPath::new(0, 0)), Some(IndexPath::new(0, 0)));
        assert_eq!(change.remap(IndexPath::new(0, 1)), Some(IndexPath::new(0, 2)));
        assert_eq!(change.remap(IndexPath::new(0, 4)), Some(IndexPath::new(0, 5)));
        assert_eq!(change.remap(IndexPath::new(1, 1)), Some(IndexPath::new(1, 1)));
        assert_eq!(change.remap_section(3), Some(3));
    }

    #[test]
    fn test_row_deleted_drops_and_compacts() {
        let change = StructuralChange::RowDeleted(IndexPath::new(1, 2));
        assert_eq!(change.remap(IndexPath::new(1, 1)), Some(IndexPath::new(1, 1)));
        assert_eq!(change.remap(IndexPath::new(1, 2)), None);
        assert_eq!(change.remap(IndexPath::new(1, 3)), Some(IndexPath::new(1, 2)));
        assert_eq!(change.remap(IndexPath::new(0, 9)), Some(IndexPath::new(0, 9)));
    }

    #[test]
    fn test_section_changes() {
        let inserted = StructuralChange::SectionInserted(1);
        assert_eq!(inserted.remap(IndexPath::new(0, 2)), Some(IndexPath::new(0, 2)));
        assert_eq!(inserted.remap(IndexPath::new(1, 2)), Some(IndexPath::new(2, 2)));
        assert_eq!(inserted.remap_section(0), Some(0));
        assert_eq!(inserted.remap_section(1), Some(2));

        let deleted = StructuralChange::SectionDeleted(1);
        assert_eq!(deleted.remap(IndexPath::new(1, 0)), None);
        assert_eq!(deleted.remap(IndexPath::new(2, 4)), Some(IndexPath::new(1, 4)));
        assert_eq!(deleted.remap_section(1), None);
        assert_eq!(deleted.remap_section(2), Some(1));
        assert_eq!(deleted.remap_section(0), Some(0));
    }
}
