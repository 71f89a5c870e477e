//! The Skip-List Engine (spec.md §4.2): the multi-level, doubly linked, order-statistic graph.
//!
//! `Inner<K, V>` owns the whole node graph through a [`NodeCache`]; every node is referenced by
//! [`NodeId`], never by raw pointer. This module holds the instance state and the structural
//! helpers of spec.md §4.3; the three descents live in `search.rs`, point/range mutation in
//! `mutate.rs`, and rank translation in `rank.rs`.

mod mutate;
mod rank;
mod search;

use oorandom::Rand32;

use crate::cache::NodeCache;
use crate::config::SkipListConfig;
use crate::key::Key;
use crate::mode::Mode;
use crate::node::{Node, NodeId};
use crate::rng::seed_from_entropy;

pub(crate) use search::Descent;


/// The skip-list engine's instance state, guarded by the per-instance lock in `map.rs`.
#[derive(Debug)]
pub(crate) struct Inner<K, V> {
    cache: NodeCache<K, V>,
    /// Top-of-stack header node (one per level, chained down via `parent`).
    header: NodeId,
    /// Top-of-stack trailer node (one per level, chained down via `parent`).
    trailer: NodeId,
    /// Total number of levels currently in use, including the bottom level. Always `>= 1`.
    height: usize,
    /// Count of user items (bottom-level real nodes).
    size: usize,
    /// Reused scratch sequence recording a descent's search path, top-to-bottom. Cleared at the
    /// start of every descent; never meaningful between public operations (invariant 7).
    stack: Vec<NodeId>,
    rng: Rand32,
    mode: Mode,
    max_height: usize,
}

impl<K: Key, V> Inner<K, V> {
    pub(crate) fn new(mode: Mode, config: SkipListConfig) -> Self {
        let mut cache = NodeCache::with_capacity(config.initial_capacity);
        let header = cache.acquire(Node::new_rail(K::sentinel(), None));
        let trailer = cache.acquire(Node::new_rail(K::sentinel(), None));
        cache.get_mut(header).next = Some(trailer);
        cache.get_mut(trailer).prev = Some(header);

        Self {
            cache,
            header,
            trailer,
            height: 1,
            size: 0,
            stack: Vec::new(),
            rng: seed_from_entropy(),
            mode,
            max_height: config.max_height.max(1),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub(crate) fn max_height(&self) -> usize {
        self.max_height
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        self.cache.get(id)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.cache.get_mut(id)
    }

    #[inline]
    pub(crate) fn free_count(&self) -> usize {
        self.cache.free_count()
    }

    /// Bottom-level leftmost real node, or `None` if the list is empty.
    pub(crate) fn ground_left(&self) -> Option<NodeId> {
        let bottom_header = self.bottom_header();
        self.node(bottom_header).next.filter(|&n| !self.node(n).is_rail())
    }

    /// Bottom-level rightmost real node, or `None` if the list is empty.
    pub(crate) fn ground_right(&self) -> Option<NodeId> {
        let bottom_trailer = self.bottom_trailer();
        self.node(bottom_trailer).prev.filter(|&n| !self.node(n).is_rail())
    }

    /// Bottom-level header, reached by following `parent` down from the top header.
    pub(crate) fn bottom_header(&self) -> NodeId {
        let mut cur = self.header;
        while let Some(p) = self.node(cur).parent {
            cur = p;
        }
        cur
    }

    /// Bottom-level trailer, reached by following `parent` down from the top trailer.
    pub(crate) fn bottom_trailer(&self) -> NodeId {
        let mut cur = self.trailer;
        while let Some(p) = self.node(cur).parent {
            cur = p;
        }
        cur
    }

    /// Release every real node to the cache's free list, then reinitialize as a fresh, empty,
    /// single-level list. The cache's backing arena capacity is preserved.
    pub(crate) fn clear_retaining_capacity(&mut self) {
        self.release_all_real_nodes();
        self.collapse_to_single_level();
        self.size = 0;
        tracing::event!(tracing::Level::DEBUG, "skiplist cleared, capacity retained");
    }

    /// Destroy every node via the cache (releasing the backing arena's capacity too), then
    /// reinitialize as a fresh, empty, single-level list.
    pub(crate) fn clear_and_reset(&mut self) {
        self.cache.destroy_pool();
        self.rebuild_empty_rails();
        self.height = 1;
        self.size = 0;
        tracing::event!(tracing::Level::DEBUG, "skiplist cleared and arena capacity released");
    }

    fn release_all_real_nodes(&mut self) {
        let bottom_header = self.bottom_header();
        let mut cur = self.node(bottom_header).next;
        while let Some(id) = cur {
            if self.node(id).is_rail() {
                break;
            }
            let next = self.node(id).next;
            self.cache.release(id);
            cur = next;
        }
    }

    fn collapse_to_single_level(&mut self) {
        // Walk up releasing every rail level above the bottom, then relink the bottom rail.
        let bottom_header = self.bottom_header();
        let bottom_trailer = self.bottom_trailer();

        let mut header_above = self.node(self.header).parent;
        let mut cur = self.header;
        while header_above.is_some() {
            let next_cur = header_above.expect("checked is_some");
            self.cache.release(cur);
            cur = next_cur;
            header_above = self.node(cur).parent;
        }
        // The loop above stops with `cur` at the bottom header, without releasing it.
        let mut trailer_above = self.node(self.trailer).parent;
        let mut tcur = self.trailer;
        while trailer_above.is_some() {
            let next_cur = trailer_above.expect("checked is_some");
            self.cache.release(tcur);
            tcur = next_cur;
            trailer_above = self.node(tcur).parent;
        }

        self.header = bottom_header;
        self.trailer = bottom_trailer;
        self.node_mut(self.header).next = Some(self.trailer);
        self.node_mut(self.header).parent = None;
        self.node_mut(self.trailer).prev = Some(self.header);
        self.node_mut(self.trailer).parent = None;
        self.height = 1;
    }

    /// Create express levels `self.height..new_height`, each a fresh header/trailer pair chained
    /// down via `parent` to the previous top. No-op (returns an empty `Vec`) if `new_height <=
    /// self.height`. Returns the new levels' header ids, bottom-to-top (index `0` is level
    /// `self.height` as it stood on entry).
    fn grow_levels(&mut self, new_height: usize) -> Vec<NodeId> {
        let mut new_headers = Vec::new();
        while self.height < new_height {
            let new_header = self.cache.acquire(Node::new_rail(K::sentinel(), Some(self.header)));
            let new_trailer = self.cache.acquire(Node::new_rail(K::sentinel(), Some(self.trailer)));
            self.node_mut(new_header).next = Some(new_trailer);
            self.node_mut(new_trailer).prev = Some(new_header);
            self.header = new_header;
            self.trailer = new_trailer;
            new_headers.push(new_header);
            self.height += 1;
        }
        new_headers
    }

    fn rebuild_empty_rails(&mut self) {
        let header = self.cache.acquire(Node::new_rail(K::sentinel(), None));
        let trailer = self.cache.acquire(Node::new_rail(K::sentinel(), None));
        self.node_mut(header).next = Some(trailer);
        self.node_mut(trailer).prev = Some(header);
        self.header = header;
        self.trailer = trailer;
    }

    /// Check whether `id` refers to this engine's current top-level trailer's bottom projection,
    /// i.e. whether `id` is a rail node (used by descents to recognize "no further neighbor").
    #[inline]
    pub(crate) fn is_rail(&self, id: NodeId) -> bool {
        self.node(id).is_rail()
    }
}


#[cfg(test)]
impl<K: Key, V> Inner<K, V> {
    /// Walks every level top-to-bottom, asserting that level's real-node widths sum to `size`
    /// (invariant 4, spec.md §3/§8) and that bottom-level real nodes always carry width `1`.
    /// Spot-checked at the end of mutating unit tests below.
    pub(crate) fn check_invariants(&self) {
        let mut level_header = self.header;
        loop {
            let is_bottom = self.node(level_header).parent.is_none();
            let mut cur = self.node(level_header).next.expect("header always has a next");
            let mut width_sum = 0_u64;
            while !self.is_rail(cur) {
                let width = self.node(cur).width;
                if is_bottom {
                    assert_eq!(width, 1, "bottom-level real node width must always be 1");
                }
                width_sum += width;
                cur = self.node(cur).next.expect("a non-trailer node always has a next");
            }
            assert_eq!(width_sum as usize, self.size, "level widths must sum to size");

            match self.node(level_header).parent {
                Some(parent) => level_header = parent,
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_engine() -> Inner<i32, i32> {
        Inner::new(Mode::Set, SkipListConfig::default())
    }

    #[test]
    fn new_engine_is_empty() {
        let e = new_engine();
        assert_eq!(e.len(), 0);
        assert!(e.ground_left().is_none());
        assert!(e.ground_right().is_none());
    }

    #[test]
    fn clear_retaining_capacity_on_empty_is_noop() {
        let mut e = new_engine();
        e.clear_retaining_capacity();
        assert_eq!(e.len(), 0);
    }

    #[test]
    fn clear_and_reset_on_empty_is_noop() {
        let mut e = new_engine();
        e.clear_and_reset();
        assert_eq!(e.len(), 0);
        assert_eq!(e.free_count(), 0);
    }

    /// Inserting enough keys drives random multi-level promotion with overwhelming probability,
    /// including promotions whose successor at the promoted level is a non-rail node — the case
    /// the width formula previously undercounted by one.
    #[test]
    fn put_keeps_level_widths_summing_to_size() {
        let mut e = new_engine();
        for k in 0..500 {
            e.put(k, k * 10);
            e.check_invariants();
        }
    }

    #[test]
    fn remove_by_key_keeps_level_widths_summing_to_size() {
        let mut e = new_engine();
        for k in 0..300 {
            e.put(k, k);
        }
        for k in (0..300).step_by(3) {
            e.remove_by_key(&k);
            e.check_invariants();
        }
    }

    #[test]
    fn remove_by_rank_keeps_level_widths_summing_to_size() {
        let mut e = new_engine();
        for k in 0..300 {
            e.put(k, k);
        }
        while e.len() > 0 {
            e.remove_by_rank(e.len() as u64 / 2);
            e.check_invariants();
        }
    }

    #[test]
    fn remove_slice_by_key_keeps_level_widths_summing_to_size() {
        let mut e = new_engine();
        for k in 0..300 {
            e.put(k, k);
        }
        e.remove_slice_by_key(&50, &200).unwrap();
        e.check_invariants();
    }

    #[test]
    fn remove_slice_by_index_keeps_level_widths_summing_to_size() {
        let mut e = new_engine();
        for k in 0..300 {
            e.put(k, k);
        }
        e.remove_slice_by_index(50, 200).unwrap();
        e.check_invariants();
    }
}
