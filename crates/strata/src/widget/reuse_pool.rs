//! Identifier-keyed recycling of retired items.

use std::collections::HashMap;

use strata_core::logging::targets;

/// Retired items grouped by reuse identifier.
///
/// The pool holds keys, not items: the owning store decides when an item is
/// destroyed. Membership is unordered; [`dequeue`](Self::dequeue) makes no
/// promise about which hidden member it returns.
#[derive(Debug, Clone)]
pub struct ReusePool<K> {
    pools: HashMap<String, Vec<K>>,
}

impl<K> Default for ReusePool<K> {
    fn default() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + std::fmt::Debug> ReusePool<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a retired item under `identifier`.
    ///
    /// The caller must have hidden the item. Returns `false` if it was
    /// already pooled.
    pub fn store(&mut self, identifier: &str, key: K) -> bool {
        let members = self.pools.entry(identifier.to_owned()).or_default();
        if members.contains(&key) {
            return false;
        }
        members.push(key);
        tracing::trace!(target: targets::REUSE, identifier, ?key, pooled = members.len(), "item pooled");
        true
    }

    /// Take out a member of `identifier`'s pool that is still hidden.
    ///
    /// Members that have been shown again since they were pooled are skipped
    /// and stay in the pool.
    pub fn dequeue(&mut self, identifier: &str, is_hidden: impl Fn(K) -> bool) -> Option<K> {
        let members = self.pools.get_mut(identifier)?;
        let position = members.iter().position(|&key| is_hidden(key))?;
        let key = members.swap_remove(position);
        tracing::trace!(target: targets::REUSE, identifier, ?key, "item dequeued");
        Some(key)
    }

    /// Remove a key from whichever pool holds it.
    pub fn remove(&mut self, key: K) -> bool {
        for members in self.pools.values_mut() {
            if let Some(position) = members.iter().position(|&k| k == key) {
                members.swap_remove(position);
                return true;
            }
        }
        false
    }

    pub fn contains(&self, key: K) -> bool {
        self.pools.values().any(|members| members.contains(&key))
    }

    /// Number of pooled members for one identifier.
    pub fn count(&self, identifier: &str) -> usize {
        self.pools.get(identifier).map_or(0, Vec::len)
    }

    /// Total number of pooled members.
    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.pools.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_deduplicates() {
        let mut pool = ReusePool::new();
        assert!(pool.store("cell", 1));
        assert!(!pool.store("cell", 1));
        assert!(pool.store("cell", 2));
        assert!(pool.store("other", 3));

        assert_eq!(pool.count("cell"), 2);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_dequeue_skips_visible_members() {
        let mut pool = ReusePool::new();
        pool.store("cell", 1);
        pool.store("cell", 2);

        // Item 1 was shown again by someone else.
        let dequeued = pool.dequeue("cell", |key| key != 1);
        assert_eq!(dequeued, Some(2));
        assert!(pool.contains(1));
        assert_eq!(pool.dequeue("cell", |key| key != 1), None);
    }

    #[test]
    fn test_dequeue_unknown_identifier() {
        let mut pool: ReusePool<u32> = ReusePool::new();
        assert_eq!(pool.dequeue("missing", |_| true), None);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut pool = ReusePool::new();
        pool.store("a", 1);
        pool.store("b", 2);

        assert!(pool.remove(2));
        assert!(!pool.remove(2));
        assert_eq!(pool.len(), 1);

        pool.clear();
        assert!(pool.is_empty());
    }
}
