//! The forward/backward cursor of spec.md §4.2.6, holding a shared lock for its lifetime.
//!
//! Grounded in `anchored-skiplist/src/iter_defaults.rs`'s `SkiplistIter`, which also walks a
//! cursor forward and backward over arena-housed nodes. That crate yields borrowed `&'a [u8]`
//! slices through a documented `unsafe` lifetime extension; this crate instead requires
//! `V: Clone` and yields owned items, keeping the whole crate free of `unsafe` (see `DESIGN.md`).

use std::sync::RwLockReadGuard;

use crate::engine::Inner;
use crate::key::Key;
use crate::node::NodeId;

/// A forward/backward cursor over a [`crate::SkipList`]'s bottom level, holding a shared lock
/// for its lifetime (spec.md §4.2.6).
///
/// `current` always refers to the next node that would be captured in whichever direction is
/// called next; it starts at the cursor's anchor and is restored there by [`Iter::reset`].
///
/// Note the documented one-node "lag" when reversing mid-stream: after `prev()` returns an item
/// and the caller then calls `next()`, the returned item is that node's *left* neighbor, not the
/// node itself — `prev()` already stepped past it. The test suite treats this as contractual.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    guard: RwLockReadGuard<'a, Inner<K, V>>,
    anchor: NodeId,
    current: NodeId,
}

impl<'a, K: Key, V: Clone> Iter<'a, K, V> {
    pub(crate) fn new(guard: RwLockReadGuard<'a, Inner<K, V>>, anchor: NodeId) -> Self {
        Self { current: anchor, anchor, guard }
    }

    /// While `current` is a real node, capture its item, advance to `current.next`, and return
    /// the captured item. Once `current` is the trailer, snap it to `ground_right` (if the list
    /// is nonempty) so an immediate `prev()` resumes from the end, and return `None`.
    pub fn next(&mut self) -> Option<(K, V)> {
        if self.guard.is_rail(self.current) {
            if let Some(prev) = self.guard.node(self.current).prev {
                if !self.guard.is_rail(prev) {
                    self.current = prev;
                }
            }
            return None;
        }

        let node = self.guard.node(self.current);
        let item = (node.key.clone(), node.value.clone().expect("bottom-level node always carries a value"));
        self.current = node.next.expect("a real node always has a next");
        Some(item)
    }

    /// While `current` has a non-rail predecessor, capture its item, step left, and return the
    /// captured item. Once there is nothing further left, step one node right (landing back on
    /// `ground_left` if the list is nonempty) so an immediate `next()` resumes from the start,
    /// and return `None`.
    pub fn prev(&mut self) -> Option<(K, V)> {
        if self.guard.is_rail(self.current) {
            if let Some(next) = self.guard.node(self.current).next {
                if !self.guard.is_rail(next) {
                    self.current = next;
                }
            }
            return None;
        }

        let node = self.guard.node(self.current);
        let item = (node.key.clone(), node.value.clone().expect("bottom-level node always carries a value"));
        self.current = node.prev.expect("a real node always has a prev");
        Some(item)
    }

    /// Restore `current` to the anchor captured at construction.
    pub fn reset(&mut self) {
        self.current = self.anchor;
    }
}
