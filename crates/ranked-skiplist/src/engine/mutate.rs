//! Insertion, point removal, and the two half-open range removals (spec.md §4.2.2–§4.2.4).

use std::cmp::Ordering;

use super::{Descent, Inner};
use crate::error::{Error, Result};
use crate::key::Key;
use crate::mode::Mode;
use crate::node::{Node, NodeId};
use crate::rng::random_node_height;

impl<K: Key, V> Inner<K, V> {
    /// Insert `key`/`value` (spec.md §4.2.2). In `Set` mode, an existing equal key has its value
    /// overwritten in place rather than a new item being inserted. Returns `true` if a new item
    /// was inserted, `false` if an existing value was overwritten.
    pub(crate) fn put(&mut self, key: K, value: V) -> bool {
        let (found, ranks) = self.descend_for_insert(&key);

        if found && self.mode == Mode::Set {
            let bottom = *self.stack.last().expect("descent always records the bottom level");
            self.node_mut(bottom).value = Some(value);
            tracing::event!(tracing::Level::TRACE, "put overwrote existing key in set mode");
            return false;
        }

        let base_rank = *ranks.last().expect("descent always records the bottom level");
        let old_height = self.height;
        let new_height = random_node_height(&mut self.rng, self.max_height);
        let new_headers = self.grow_levels(new_height);

        // Bottom level: every real node's width is always 1 there, so no width bookkeeping is
        // needed beyond giving the new node that width.
        let pred_bottom = self.stack.pop().expect("descent always records the bottom level");
        let old_next = self.node(pred_bottom).next.expect("every real node has a next link");
        let bottom_node = self.cache.acquire(Node::new_item(key.clone(), value, 1));
        self.node_mut(bottom_node).prev = Some(pred_bottom);
        self.node_mut(bottom_node).next = Some(old_next);
        self.node_mut(pred_bottom).next = Some(bottom_node);
        self.node_mut(old_next).prev = Some(bottom_node);

        let mut child = bottom_node;
        for level in 1..new_height.max(old_height) {
            let promoted = level < new_height;
            let (u, rank_at_u) = if level < old_height {
                let idx = old_height - 1 - level;
                (self.stack[idx], ranks[idx])
            } else {
                (new_headers[level - old_height], 0)
            };
            let old_next = self.node(u).next.expect("every real/rail node has a next link");

            if promoted {
                let gap = base_rank + 1 - rank_at_u;
                let express = self.cache.acquire(Node::new_express(key.clone(), Some(child), gap));
                self.node_mut(express).prev = Some(u);
                self.node_mut(express).next = Some(old_next);
                self.node_mut(u).next = Some(express);
                self.node_mut(old_next).prev = Some(express);
                if !self.is_rail(old_next) {
                    let old_w = self.node(old_next).width;
                    self.node_mut(old_next).width = old_w + 1 - gap;
                }
                child = express;
            } else if !self.is_rail(old_next) {
                let old_w = self.node(old_next).width;
                self.node_mut(old_next).width = old_w + 1;
            }
        }

        self.size += 1;
        tracing::event!(tracing::Level::TRACE, new_height, "put inserted a new item");
        true
    }

    /// `update(k, v)` (spec.md §6): overwrite the value at an existing key without inserting a
    /// new item. Returns whether `key` was present. In `list` mode this updates only the
    /// rightmost occurrence, matching `get`'s own "rightmost wins" convention.
    pub(crate) fn update(&mut self, key: &K, value: V) -> bool {
        if !self.descend(key, Descent::FloorOrEqual) {
            return false;
        }
        let bottom = *self.stack.last().expect("descent always records the bottom level");
        self.node_mut(bottom).value = Some(value);
        true
    }

    /// `updateByIndex(i, v)` (spec.md §6): overwrite the value at `i` (after negative-index
    /// normalization). Returns whether `i` was in range.
    pub(crate) fn update_by_index(&mut self, index: i64, value: V) -> bool {
        let Some(rank) = self.normalize_index(index) else { return false };
        let node = self.locate_by_rank(rank);
        self.node_mut(node).value = Some(value);
        true
    }

    /// Point removal by key (spec.md §4.2.3), returning the removed value if `key` was present.
    pub(crate) fn remove_by_key(&mut self, key: &K) -> Option<V> {
        if !self.descend(key, Descent::FloorOrEqual) {
            return None;
        }

        let is_target: Vec<bool> = self.stack.iter()
            .map(|&id| !self.is_rail(id) && matches!(self.node(id).key.key_cmp(key), Ordering::Equal))
            .collect();
        let bottom = self.splice_marked_path(&is_target);
        let removed = self.cache.release(bottom);
        self.size -= 1;
        tracing::event!(tracing::Level::TRACE, "removed item by key");
        removed.value
    }

    /// Point removal by 0-based rank (spec.md §4.2.5). Caller must validate `rank < self.len()`.
    pub(crate) fn remove_by_rank(&mut self, rank: u64) -> V {
        let (_, remaining_after) = self.descend_by_rank(rank);
        let is_target: Vec<bool> = remaining_after.iter().map(|&r| r == 0).collect();
        let bottom = self.splice_marked_path(&is_target);
        let removed = self.cache.release(bottom);
        self.size -= 1;
        tracing::event!(tracing::Level::TRACE, "removed item by index");
        removed.value.expect("bottom-level node always carries a value")
    }

    /// Removes every level's marked entry, from `self.stack` (top-to-bottom, consumed via `pop`,
    /// so processed bottom-to-top). `is_target[i]` tells whether `self.stack[i]` is itself part of
    /// the item being removed at that level, or merely a predecessor. Returns the bottom-level
    /// node id (released by the caller, after it has had a chance to read its value out).
    fn splice_marked_path(&mut self, is_target: &[bool]) -> NodeId {
        debug_assert_eq!(is_target.len(), self.stack.len());
        let mut removed_bottom = None;

        while let Some(cur) = self.stack.pop() {
            let i = self.stack.len();
            let next = self.node(cur).next.expect("non-trailer node has a next");

            if is_target[i] {
                let prev = self.node(cur).prev.expect("non-header node has a prev");
                self.node_mut(prev).next = Some(next);
                self.node_mut(next).prev = Some(prev);
                if !self.is_rail(next) {
                    let cur_w = self.node(cur).width;
                    let next_w = self.node(next).width;
                    self.node_mut(next).width = cur_w + next_w - 1;
                }
                if removed_bottom.is_none() {
                    removed_bottom = Some(cur);
                } else {
                    self.cache.release(cur);
                }
            } else if !self.is_rail(next) {
                let next_w = self.node(next).width;
                self.node_mut(next).width = next_w.saturating_sub(1);
            }
        }

        removed_bottom.expect("the bottom level is always the removal target")
    }

    /// Half-open `[start_key, stop_key)` removal (spec.md §4.2.4). `start_key == stop_key` is
    /// always a valid no-op. Otherwise both endpoints must be present.
    pub(crate) fn remove_slice_by_key(&mut self, start: &K, stop: &K) -> Result<bool> {
        match start.key_cmp(stop) {
            Ordering::Greater => return Err(Error::StartKeyIsGreaterThanEndKey),
            Ordering::Equal => return Ok(false),
            Ordering::Less => {},
        }

        if !self.descend(start, Descent::LeftmostEqual) {
            return Err(Error::MissingStartKey);
        }
        let s_path = std::mem::take(&mut self.stack);

        self.descend(stop, Descent::StrictlyLess);
        let e_bottom = *self.stack.last().expect("descent always records the bottom level");
        let next_after_e = self.node(e_bottom).next.expect("bottom node always has a next");
        if self.is_rail(next_after_e) || !matches!(self.node(next_after_e).key.key_cmp(stop), Ordering::Equal) {
            self.stack.clear();
            return Err(Error::MissingEndKey);
        }
        let e_path = std::mem::take(&mut self.stack);

        let bottom_idx = s_path.len() - 1;
        let pred_bottom = self.predecessor_for_key_range(s_path[bottom_idx], start);
        let (_, total_removed) = self.release_range_at_level(pred_bottom, e_path[bottom_idx]);

        for i in 0..bottom_idx {
            let pred = self.predecessor_for_key_range(s_path[i], start);
            let (successor, removed_here) = self.release_range_at_level(pred, e_path[i]);
            if removed_here > 0 && !self.is_rail(successor) {
                let old_w = self.node(successor).width;
                self.node_mut(successor).width = old_w + removed_here - total_removed;
            }
        }

        self.size -= total_removed as usize;
        tracing::event!(tracing::Level::TRACE, total_removed, "removed range by key");
        Ok(true)
    }

    /// Half-open `[start, stop)` removal by index (spec.md §4.2.4/§4.2.5). Negative indices are
    /// normalized as `size - |n|`. `stop` is clamped into `[0, size]`; `start >= size` is a
    /// no-op (`false`); `start == stop` or `start > stop` (after normalizing/clamping) is
    /// `Error::InvalidIndex`.
    pub(crate) fn remove_slice_by_index(&mut self, start: i64, stop: i64) -> Result<bool> {
        let len = self.size as i64;
        let normalize = |i: i64| if i < 0 { i + len } else { i };
        let start_n = normalize(start);
        let stop_c = normalize(stop).clamp(0, len);

        if start_n < 0 {
            return Err(Error::InvalidIndex);
        }
        if start_n >= len {
            return Ok(false);
        }
        if start_n >= stop_c {
            return Err(Error::InvalidIndex);
        }

        let start_rank = start_n as u64;
        let end_rank = (stop_c - 1) as u64;

        let (_, s_remaining) = self.descend_by_rank(start_rank);
        let s_path = std::mem::take(&mut self.stack);
        let (_, _) = self.descend_by_rank(end_rank);
        let e_path = std::mem::take(&mut self.stack);

        let total_removed = (stop_c - start_n) as u64;
        let bottom_idx = s_path.len() - 1;

        let pred_bottom = self.predecessor_for_rank_range(s_path[bottom_idx], s_remaining[bottom_idx] == 0);
        let (_, removed_here) = self.release_range_at_level(pred_bottom, e_path[bottom_idx]);
        debug_assert_eq!(removed_here, total_removed, "bottom-level widths are always 1");

        for i in 0..bottom_idx {
            let pred = self.predecessor_for_rank_range(s_path[i], s_remaining[i] == 0);
            let (successor, removed_here) = self.release_range_at_level(pred, e_path[i]);
            if removed_here > 0 && !self.is_rail(successor) {
                let old_w = self.node(successor).width;
                self.node_mut(successor).width = old_w + removed_here - total_removed;
            }
        }

        self.size -= total_removed as usize;
        tracing::event!(tracing::Level::TRACE, total_removed, "removed range by index");
        Ok(true)
    }

    fn predecessor_for_key_range(&self, s_node: NodeId, start: &K) -> NodeId {
        if !self.is_rail(s_node) && matches!(self.node(s_node).key.key_cmp(start), Ordering::Equal) {
            self.node(s_node).prev.expect("a real node always has a prev")
        } else {
            s_node
        }
    }

    fn predecessor_for_rank_range(&self, s_node: NodeId, is_target: bool) -> NodeId {
        if is_target {
            self.node(s_node).prev.expect("a real node always has a prev")
        } else {
            s_node
        }
    }

    /// Releases every node from `pred`'s successor through `e_node` inclusive on one level,
    /// relinking `pred` directly to the surviving successor. A no-op (`(successor, 0)`) if
    /// `pred == e_node` (nothing in the range reached this level). Returns `(successor, sum of
    /// the released nodes' own width fields)` — at the bottom level every width is `1`, so that
    /// sum is also the count of items removed.
    fn release_range_at_level(&mut self, pred: NodeId, e_node: NodeId) -> (NodeId, u64) {
        if pred == e_node {
            let successor = self.node(pred).next.expect("pred always has a next");
            return (successor, 0);
        }

        let mut cur = self.node(pred).next.expect("pred always has a next");
        let mut removed_width_sum = 0_u64;
        loop {
            let next = self.node(cur).next.expect("a node up to and including e_node has a next");
            removed_width_sum += self.node(cur).width;
            let reached_e = cur == e_node;
            self.cache.release(cur);
            if reached_e {
                self.node_mut(pred).next = Some(next);
                self.node_mut(next).prev = Some(pred);
                return (next, removed_width_sum);
            }
            cur = next;
        }
    }
}
