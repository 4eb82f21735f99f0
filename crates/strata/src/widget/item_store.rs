//! Ownership of every visual item the table has created.
//!
//! The store owns items; everything else (visible set, reuse pools, the
//! footer slot) refers to them by [`ItemKey`]. Items are destroyed only when
//! the table reloads, or when the host removes one explicitly.

use slotmap::{SlotMap, new_key_type};
use strata_core::logging::targets;

use super::item::ViewItem;
use super::reuse_pool::ReusePool;

new_key_type! {
    /// Handle to an item in an [`ItemStore`].
    ///
    /// Keys stay valid until the item is removed or the table reloads.
    pub struct ItemKey;
}

/// Which reuse pool an item returns to when it is retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    Cell,
    Header,
}

/// Owner of a table's visual items and their reuse pools.
pub struct ItemStore<I> {
    items: SlotMap<ItemKey, I>,
    cells: ReusePool<ItemKey>,
    headers: ReusePool<ItemKey>,
    /// Keys created or dequeued since the current request began, with the
    /// pool a dequeued key came from.
    pending: Vec<(ItemKey, Option<ItemRole>)>,
    next_z_order: u64,
}

impl<I> Default for ItemStore<I> {
    fn default() -> Self {
        Self {
            items: SlotMap::with_key(),
            cells: ReusePool::default(),
            headers: ReusePool::default(),
            pending: Vec::new(),
            next_z_order: 0,
        }
    }
}

impl<I: ViewItem> ItemStore<I> {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Take ownership of a new item.
    pub fn insert(&mut self, item: I) -> ItemKey {
        let key = self.items.insert(item);
        self.pending.push((key, None));
        key
    }

    pub fn get(&self, key: ItemKey) -> Option<&I> {
        self.items.get(key)
    }

    pub fn get_mut(&mut self, key: ItemKey) -> Option<&mut I> {
        self.items.get_mut(key)
    }

    pub fn contains(&self, key: ItemKey) -> bool {
        self.items.contains_key(key)
    }

    /// Destroy one item, dropping it from the pools as well.
    pub fn remove(&mut self, key: ItemKey) -> Option<I> {
        self.cells.remove(key);
        self.headers.remove(key);
        self.items.remove(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &I)> {
        self.items.iter()
    }

    // =========================================================================
    // Reuse
    // =========================================================================

    /// Take a hidden row item pooled under `identifier`, if there is one.
    pub fn dequeue_reusable_cell(&mut self, identifier: &str) -> Option<ItemKey> {
        let items = &self.items;
        let key = self.cells.dequeue(identifier, |key| {
            items.get(key).is_some_and(ViewItem::is_hidden)
        })?;
        self.pending.push((key, Some(ItemRole::Cell)));
        Some(key)
    }

    /// Take a hidden header item pooled under `identifier`, if there is one.
    pub fn dequeue_reusable_header(&mut self, identifier: &str) -> Option<ItemKey> {
        let items = &self.items;
        let key = self.headers.dequeue(identifier, |key| {
            items.get(key).is_some_and(ViewItem::is_hidden)
        })?;
        self.pending.push((key, Some(ItemRole::Header)));
        Some(key)
    }

    /// The reuse pool for one role.
    pub fn pool(&self, role: ItemRole) -> &ReusePool<ItemKey> {
        match role {
            ItemRole::Cell => &self.cells,
            ItemRole::Header => &self.headers,
        }
    }

    /// Hide an item and return it to its pool.
    pub(crate) fn retire(&mut self, key: ItemKey, role: ItemRole) {
        let Some(item) = self.items.get_mut(key) else {
            return;
        };
        item.hide();
        let pool = match role {
            ItemRole::Cell => &mut self.cells,
            ItemRole::Header => &mut self.headers,
        };
        pool.store(item.reuse_identifier(), key);
    }

    /// Remove a key from the pools because it is about to be shown.
    pub(crate) fn claim(&mut self, key: ItemKey) {
        self.cells.remove(key);
        self.headers.remove(key);
    }

    /// Start tracking items handed out to the data source.
    pub(crate) fn begin_request(&mut self) {
        self.pending.clear();
    }

    /// Return every item created or dequeued during the request, other than
    /// the one the data source handed back, to a pool.
    ///
    /// Dequeued items go back where they came from; new items join the pool
    /// for `role`.
    pub(crate) fn finish_request(&mut self, role: ItemRole, used: Option<ItemKey>) {
        let pending = std::mem::take(&mut self.pending);
        for (key, origin) in pending {
            if Some(key) != used {
                let role = origin.unwrap_or(role);
                tracing::trace!(target: targets::REUSE, ?key, ?role, "unused item returned to pool");
                self.retire(key, role);
            }
        }
    }

    /// Put an item on top of every item raised before it.
    pub(crate) fn raise(&mut self, key: ItemKey) {
        if let Some(item) = self.items.get_mut(key) {
            self.next_z_order += 1;
            item.item_base_mut().set_z_order(self.next_z_order);
        }
    }

    /// Destroy every item except `keep`.
    pub(crate) fn clear_except(&mut self, keep: Option<ItemKey>) {
        let before = self.items.len();
        self.items.retain(|key, _| Some(key) == keep);
        self.cells.clear();
        self.headers.clear();
        self.pending.clear();
        tracing::debug!(target: targets::REUSE, destroyed = before - self.items.len(), "item store cleared");
    }
}
