//! Row selection state.
//!
//! [`SelectionModel`] tracks which rows are selected, in either single or
//! multiple selection mode, and reports every change through
//! [`selection_changed`](SelectionModel::selection_changed).
//!
//! # Example
//!
//! ```
//! use strata::model::{IndexPath, SelectionModel};
//!
//! let mut selection = SelectionModel::new();
//! selection.select(IndexPath::new(0, 2));
//! selection.select(IndexPath::new(0, 4));
//!
//! // Single mode: the newer path replaces the older one.
//! assert!(!selection.is_selected(IndexPath::new(0, 2)));
//! assert_eq!(selection.selected_index_path(), Some(IndexPath::new(0, 4)));
//!
//! selection.set_allows_multiple_selection(true);
//! selection.select(IndexPath::new(1, 0));
//! assert_eq!(selection.selected_count(), 2);
//! ```

use std::collections::HashSet;

use strata_core::Signal;
use strata_core::logging::targets;

use super::index_path::{IndexPath, StructuralChange};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SelectionState {
    Single(Option<IndexPath>),
    Multiple {
        /// Selection order, oldest first.
        order: Vec<IndexPath>,
        members: HashSet<IndexPath>,
    },
}

impl SelectionState {
    fn multiple_from(paths: impl IntoIterator<Item = IndexPath>) -> Self {
        let order: Vec<IndexPath> = paths.into_iter().collect();
        let members = order.iter().copied().collect();
        Self::Multiple { order, members }
    }
}

/// Manages row selection for a table view.
///
/// # Signals
///
/// - `selection_changed`: Emitted with `(selected, deselected)` paths
///   whenever membership changes
pub struct SelectionModel {
    allows_selection: bool,
    state: SelectionState,

    /// Emitted when selection changes. Args: (selected, deselected)
    pub selection_changed: Signal<(Vec<IndexPath>, Vec<IndexPath>)>,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SelectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionModel")
            .field("allows_selection", &self.allows_selection)
            .field("state", &self.state)
            .finish()
    }
}

impl SelectionModel {
    /// Creates a selection model allowing single selection.
    pub fn new() -> Self {
        Self {
            allows_selection: true,
            state: SelectionState::Single(None),
            selection_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Mode
    // =========================================================================

    pub fn allows_selection(&self) -> bool {
        self.allows_selection
    }

    pub fn allows_multiple_selection(&self) -> bool {
        matches!(self.state, SelectionState::Multiple { .. })
    }

    /// Enables or disables selection.
    ///
    /// Disabling clears the selection and leaves multiple selection off.
    pub fn set_allows_selection(&mut self, allow: bool) {
        if self.allows_selection == allow {
            return;
        }
        if !allow {
            self.clear();
            self.state = SelectionState::Single(None);
        }
        self.allows_selection = allow;
        tracing::debug!(target: targets::SELECTION, allow, "selection allowed changed");
    }

    /// Switches between single and multiple selection.
    ///
    /// Enabling multiple selection also enables selection and keeps the
    /// current single selection. Disabling it keeps only the most recently
    /// selected path.
    pub fn set_allows_multiple_selection(&mut self, allow: bool) {
        if allow {
            self.allows_selection = true;
        }
        if self.allows_multiple_selection() == allow {
            return;
        }

        let mut dropped = Vec::new();
        self.state = match std::mem::replace(&mut self.state, SelectionState::Single(None)) {
            SelectionState::Single(current) => SelectionState::multiple_from(current),
            SelectionState::Multiple { mut order, .. } => {
                let last = order.pop();
                dropped = order;
                SelectionState::Single(last)
            }
        };

        tracing::debug!(target: targets::SELECTION, allow, dropped = dropped.len(), "selection mode changed");
        if !dropped.is_empty() {
            self.selection_changed.emit((Vec::new(), dropped));
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Checks if a path is selected.
    pub fn is_selected(&self, index_path: IndexPath) -> bool {
        match &self.state {
            SelectionState::Single(current) => *current == Some(index_path),
            SelectionState::Multiple { members, .. } => members.contains(&index_path),
        }
    }

    /// The selected path in single mode, or the most recently selected path
    /// in multiple mode.
    pub fn selected_index_path(&self) -> Option<IndexPath> {
        match &self.state {
            SelectionState::Single(current) => *current,
            SelectionState::Multiple { order, .. } => order.last().copied(),
        }
    }

    /// All selected paths in selection order.
    pub fn selected_index_paths(&self) -> Vec<IndexPath> {
        match &self.state {
            SelectionState::Single(current) => current.iter().copied().collect(),
            SelectionState::Multiple { order, .. } => order.clone(),
        }
    }

    pub fn selected_count(&self) -> usize {
        match &self.state {
            SelectionState::Single(current) => usize::from(current.is_some()),
            SelectionState::Multiple { order, .. } => order.len(),
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selected_count() > 0
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Selects a path. Returns `true` if membership changed.
    ///
    /// In single mode the previous selection is replaced and reported as
    /// deselected. Does nothing while selection is disabled.
    pub fn select(&mut self, index_path: IndexPath) -> bool {
        if !self.allows_selection {
            return false;
        }

        let deselected: Vec<IndexPath> = match &mut self.state {
            SelectionState::Single(current) => {
                if *current == Some(index_path) {
                    return false;
                }
                current.replace(index_path).into_iter().collect()
            }
            SelectionState::Multiple { order, members } => {
                if !members.insert(index_path) {
                    return false;
                }
                order.push(index_path);
                Vec::new()
            }
        };

        tracing::trace!(target: targets::SELECTION, %index_path, "selected");
        self.selection_changed.emit((vec![index_path], deselected));
        true
    }

    /// Deselects a path. Returns `true` if membership changed.
    pub fn deselect(&mut self, index_path: IndexPath) -> bool {
        if !self.allows_selection {
            return false;
        }

        let removed = match &mut self.state {
            SelectionState::Single(current) => {
                if *current == Some(index_path) {
                    *current = None;
                    true
                } else {
                    false
                }
            }
            SelectionState::Multiple { order, members } => {
                if members.remove(&index_path) {
                    order.retain(|path| *path != index_path);
                    true
                } else {
                    false
                }
            }
        };

        if removed {
            tracing::trace!(target: targets::SELECTION, %index_path, "deselected");
            self.selection_changed.emit((Vec::new(), vec![index_path]));
        }
        removed
    }

    /// Flips a path's membership. Returns whether it is now selected.
    ///
    /// In single mode a selected path stays selected; pressing a row there
    /// always makes it the selection.
    pub fn toggle(&mut self, index_path: IndexPath) -> bool {
        if self.allows_multiple_selection() && self.is_selected(index_path) {
            self.deselect(index_path);
        } else {
            self.select(index_path);
        }
        self.is_selected(index_path)
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        let deselected = self.selected_index_paths();
        if deselected.is_empty() {
            return;
        }
        self.state = match self.state {
            SelectionState::Single(_) => SelectionState::Single(None),
            SelectionState::Multiple { .. } => SelectionState::multiple_from([]),
        };
        tracing::debug!(target: targets::SELECTION, count = deselected.len(), "selection cleared");
        self.selection_changed.emit((Vec::new(), deselected));
    }

    /// Renumbers selected paths after an insertion or deletion.
    ///
    /// Paths removed by the change are dropped and reported as deselected.
    pub fn apply_change(&mut self, change: StructuralChange) {
        let mut dropped = Vec::new();
        match &mut self.state {
            SelectionState::Single(current) => {
                if let Some(path) = *current {
                    *current = change.remap(path);
                    if current.is_none() {
                        dropped.push(path);
                    }
                }
            }
            SelectionState::Multiple { order, members } => {
                let mut remapped = Vec::with_capacity(order.len());
                for &path in order.iter() {
                    match change.remap(path) {
                        Some(new_path) => remapped.push(new_path),
                        None => dropped.push(path),
                    }
                }
                *members = remapped.iter().copied().collect();
                *order = remapped;
            }
        }

        if !dropped.is_empty() {
            tracing::debug!(target: targets::SELECTION, ?change, dropped = dropped.len(), "selection pruned");
            self.selection_changed.emit((Vec::new(), dropped));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Changes = Arc<Mutex<Vec<(Vec<IndexPath>, Vec<IndexPath>)>>>;

    fn record(model: &SelectionModel) -> Changes {
        let changes: Changes = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        model.selection_changed.connect(move |change| {
            sink.lock().push(change.clone());
        });
        changes
    }

    fn ip(section: usize, row: usize) -> IndexPath {
        IndexPath::new(section, row)
    }

    fn deselected(paths: Vec<IndexPath>) -> (Vec<IndexPath>, Vec<IndexPath>) {
        (Vec::new(), paths)
    }

    #[test]
    fn test_single_select_replaces_previous() {
        let mut model = SelectionModel::new();
        let changes = record(&model);

        assert!(model.select(ip(0, 1)));
        assert!(model.select(ip(0, 3)));
        assert!(!model.select(ip(0, 3)));

        assert!(!model.is_selected(ip(0, 1)));
        assert!(model.is_selected(ip(0, 3)));
        assert_eq!(model.selected_count(), 1);

        let changes = changes.lock();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1], (vec![ip(0, 3)], vec![ip(0, 1)]));
    }

    #[test]
    fn test_multiple_select_and_toggle() {
        let mut model = SelectionModel::new();
        model.set_allows_multiple_selection(true);

        assert!(model.toggle(ip(0, 0)));
        assert!(model.toggle(ip(1, 2)));
        assert!(!model.toggle(ip(0, 0)));

        assert_eq!(model.selected_index_paths(), vec![ip(1, 2)]);
    }

    #[test]
    fn test_single_toggle_keeps_selection() {
        let mut model = SelectionModel::new();
        assert!(model.toggle(ip(0, 0)));
        assert!(model.toggle(ip(0, 0)));
        assert!(model.toggle(ip(0, 1)));
        assert!(!model.is_selected(ip(0, 0)));
    }

    #[test]
    fn test_disabled_selection_is_noop() {
        let mut model = SelectionModel::new();
        model.select(ip(0, 0));
        model.set_allows_selection(false);

        assert!(!model.has_selection());
        assert!(!model.select(ip(0, 1)));
        assert!(!model.deselect(ip(0, 0)));
        assert!(!model.has_selection());
    }

    #[test]
    fn test_multiple_forces_selection_on() {
        let mut model = SelectionModel::new();
        model.set_allows_selection(false);
        model.set_allows_multiple_selection(true);

        assert!(model.allows_selection());
        assert!(model.allows_multiple_selection());
    }

    #[test]
    fn test_mode_switch_keeps_latest() {
        let mut model = SelectionModel::new();
        model.select(ip(0, 5));
        model.set_allows_multiple_selection(true);
        assert_eq!(model.selected_index_paths(), vec![ip(0, 5)]);

        model.select(ip(0, 1));
        model.select(ip(2, 0));
        let changes = record(&model);
        model.set_allows_multiple_selection(false);

        assert_eq!(model.selected_index_path(), Some(ip(2, 0)));
        assert_eq!(model.selected_count(), 1);
        assert_eq!(
            changes.lock().as_slice(),
            &[deselected(vec![ip(0, 5), ip(0, 1)])]
        );
    }

    #[test]
    fn test_clear_reports_everything() {
        let mut model = SelectionModel::new();
        model.set_allows_multiple_selection(true);
        model.select(ip(0, 0));
        model.select(ip(0, 1));
        let changes = record(&model);

        model.clear();
        model.clear();

        assert!(!model.has_selection());
        assert!(model.allows_multiple_selection());
        assert_eq!(
            changes.lock().as_slice(),
            &[deselected(vec![ip(0, 0), ip(0, 1)])]
        );
    }

    #[test]
    fn test_apply_change_remaps_and_prunes() {
        let mut model = SelectionModel::new();
        model.set_allows_multiple_selection(true);
        model.select(ip(0, 0));
        model.select(ip(0, 2));
        model.select(ip(1, 0));
        let changes = record(&model);

        model.apply_change(StructuralChange::RowInserted(ip(0, 1)));
        assert_eq!(model.selected_index_paths(), vec![ip(0, 0), ip(0, 3), ip(1, 0)]);
        assert!(changes.lock().is_empty());

        model.apply_change(StructuralChange::SectionDeleted(0));
        assert_eq!(model.selected_index_paths(), vec![ip(0, 0)]);
        assert_eq!(
            changes.lock().as_slice(),
            &[deselected(vec![ip(0, 0), ip(0, 3)])]
        );
    }

    #[test]
    fn test_apply_change_single_mode() {
        let mut model = SelectionModel::new();
        model.select(ip(0, 2));

        model.apply_change(StructuralChange::RowDeleted(ip(0, 0)));
        assert_eq!(model.selected_index_path(), Some(ip(0, 1)));

        model.apply_change(StructuralChange::RowDeleted(ip(0, 1)));
        assert_eq!(model.selected_index_path(), None);
    }
}
