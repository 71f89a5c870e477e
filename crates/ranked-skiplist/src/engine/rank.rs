//! Rank-to-node translation (spec.md §4.2.5): Python-style negative indexing plus the
//! key-to-index and index-to-node lookups built on `search.rs`'s rank-aware descents.

use std::cmp::Ordering;

use super::Inner;
use crate::key::Key;
use crate::node::NodeId;

impl<K: Key, V> Inner<K, V> {
    /// Normalizes a possibly-negative index against the current length, Python-style
    /// (`-1` is the last item). Returns `None` if the result falls outside `[0, len)`.
    pub(crate) fn normalize_index(&self, index: i64) -> Option<u64> {
        let len = self.size as i64;
        let idx = if index < 0 { index + len } else { index };
        (0..len).contains(&idx).then_some(idx as u64)
    }

    /// The node at `index` (after negative-index normalization), read-only — does not disturb
    /// `self.stack`. `None` if `index` is out of range.
    pub(crate) fn node_ptr_by_index(&self, index: i64) -> Option<NodeId> {
        let rank = self.normalize_index(index)?;
        Some(self.locate_by_rank(rank))
    }

    /// The node at `index`, recording the descent's search path in `self.stack` for a subsequent
    /// mutation (e.g. `removeByIndex`). `None` if `index` is out of range.
    pub(crate) fn node_by_index_tracked(&mut self, index: i64) -> Option<NodeId> {
        let rank = self.normalize_index(index)?;
        Some(self.descend_by_rank(rank).0)
    }

    /// `getItemIndexByKey` (spec.md §4.2.5): the 0-based rank of `key`, or `None` if absent.
    pub(crate) fn index_of_key(&self, key: &K) -> Option<u64> {
        let (node, rank_plus_one) = self.locate_floor(key);
        if !self.is_rail(node) && matches!(self.node(node).key.key_cmp(key), Ordering::Equal) {
            Some(rank_plus_one - 1)
        } else {
            None
        }
    }
}
