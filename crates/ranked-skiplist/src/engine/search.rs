//! The three descent primitives of spec.md §4.2.1, plus the rank-driven descent used by the
//! by-index operations of §4.2.5.

use std::cmp::Ordering;

use super::Inner;
use crate::key::Key;
use crate::node::NodeId;


/// Which of the three key-based descents to run (spec.md §4.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Descent {
    /// Advance while `next.key <= k`. Used by `put` and point `remove`.
    FloorOrEqual,
    /// Advance while `next.key < k`. Used by range removal's `stop_key` endpoint when it differs
    /// from `start_key`.
    StrictlyLess,
    /// Advance while `next.key <= k`, then, at each level, step left across the equal-key run to
    /// land on its leftmost member. Used by range removal's `start_key` endpoint.
    ///
    /// Note: spec.md's prose describes stepping left *before* the rightward advance, but a
    /// left-step followed immediately by a rightward `<=k` scan always re-converges on the
    /// rightmost equal-keyed node (the scan does not stop at the first match), which would make
    /// this descent behaviorally identical to `FloorOrEqual` and defeat its purpose: producing an
    /// inclusive-from-the-left boundary for range splicing. Performing the rightward scan first
    /// and then stepping left is what actually yields the leftmost occurrence; see `DESIGN.md`.
    LeftmostEqual,
}

impl<K: Key, V> Inner<K, V> {
    /// Run a key-based descent, filling `self.stack` top-to-bottom with one entry per level.
    ///
    /// Clears `self.stack` first (invariant 7: the stack has no meaningful content between public
    /// operations). Returns whether a node with `key == target` was reached at the bottom level.
    pub(crate) fn descend(&mut self, target: &K, kind: Descent) -> bool {
        self.stack.clear();
        let mut cur = self.header;

        loop {
            loop {
                let Some(next) = self.node(cur).next else { break };
                if self.node(next).is_rail() {
                    break;
                }
                let advance = match kind {
                    Descent::FloorOrEqual | Descent::LeftmostEqual => {
                        !matches!(self.node(next).key.key_cmp(target), Ordering::Greater)
                    },
                    Descent::StrictlyLess => {
                        matches!(self.node(next).key.key_cmp(target), Ordering::Less)
                    },
                };

                if advance {
                    cur = next;
                } else {
                    break;
                }
            }

            if kind == Descent::LeftmostEqual && !self.node(cur).is_rail() {
                while let Some(prev) = self.node(cur).prev {
                    if self.node(prev).is_rail() {
                        break;
                    }
                    if matches!(self.node(prev).key.key_cmp(target), Ordering::Equal) {
                        cur = prev;
                    } else {
                        break;
                    }
                }
            }

            self.stack.push(cur);

            match self.node(cur).parent {
                Some(parent) => cur = parent,
                None => break,
            }
        }

        !self.node(cur).is_rail() && matches!(self.node(cur).key.key_cmp(target), Ordering::Equal)
    }

    /// Floor-or-equal descent specialized for `put` (spec.md §4.2.2): alongside `self.stack`,
    /// accumulates the 0-based rank reached at each level, top-to-bottom. The bottom entry of the
    /// returned `Vec` is the new item's prospective 0-based rank (the count of items that sort at
    /// or before it). Express-level width maintenance on insert is computed from the gap between
    /// this rank and each level's own rank entry — the standard order-statistics skip list
    /// technique (as used by e.g. Redis's `zskiplist`), adapted to this crate's convention of
    /// storing a link's span on the node it arrives at rather than on its predecessor.
    pub(crate) fn descend_for_insert(&mut self, target: &K) -> (bool, Vec<u64>) {
        self.stack.clear();
        let mut ranks = Vec::new();
        let mut cur = self.header;
        let mut rank: u64 = 0;

        loop {
            loop {
                let Some(next) = self.node(cur).next else { break };
                if self.node(next).is_rail() {
                    break;
                }
                if !matches!(self.node(next).key.key_cmp(target), Ordering::Greater) {
                    rank += self.node(next).width;
                    cur = next;
                } else {
                    break;
                }
            }

            self.stack.push(cur);
            ranks.push(rank);

            match self.node(cur).parent {
                Some(parent) => cur = parent,
                None => break,
            }
        }

        let found = !self.node(cur).is_rail() && matches!(self.node(cur).key.key_cmp(target), Ordering::Equal);
        (found, ranks)
    }

    /// Rank-based descent mirroring [`Inner::descend`], consuming `width` instead of comparing
    /// keys (spec.md §4.2.5). `rank` is the 0-based, already-normalized target rank. Fills
    /// `self.stack` top-to-bottom. Callers must validate `rank < self.len()` first.
    ///
    /// Returns the bottom-level node reached, alongside `remaining`-at-each-level, top-to-bottom
    /// and aligned with `self.stack`: `0` exactly where that level's stack entry is the node *at*
    /// `rank` itself (the express copy was promoted to that level), nonzero where the entry is
    /// only a predecessor. Point and range removal by index use this to tell the two cases apart
    /// without a second pass, the same way key-based removal compares keys.
    pub(crate) fn descend_by_rank(&mut self, rank: u64) -> (NodeId, Vec<u64>) {
        self.stack.clear();
        let mut remaining_after = Vec::new();
        let mut remaining = rank + 1;
        let mut cur = self.header;

        loop {
            loop {
                let Some(next) = self.node(cur).next else { break };
                if self.node(next).is_rail() {
                    break;
                }
                let width = self.node(next).width;
                if remaining >= width {
                    remaining -= width;
                    cur = next;
                } else {
                    break;
                }
            }

            self.stack.push(cur);
            remaining_after.push(remaining);

            match self.node(cur).parent {
                Some(parent) => cur = parent,
                None => break,
            }
        }

        (cur, remaining_after)
    }

    /// Read-only floor-or-equal locate, accumulating rank without touching `self.stack`. Returns
    /// the bottom-level node and the rank-plus-one (the item count up to and including that
    /// node), used by `getItemIndexByKey` (spec.md §4.2.5).
    pub(crate) fn locate_floor(&self, target: &K) -> (NodeId, u64) {
        let mut cur = self.header;
        let mut rank_plus_one: u64 = 0;

        loop {
            loop {
                let Some(next) = self.node(cur).next else { break };
                if self.node(next).is_rail() {
                    break;
                }
                if !matches!(self.node(next).key.key_cmp(target), Ordering::Greater) {
                    rank_plus_one += self.node(next).width;
                    cur = next;
                } else {
                    break;
                }
            }

            match self.node(cur).parent {
                Some(parent) => cur = parent,
                None => break,
            }
        }

        (cur, rank_plus_one)
    }

    /// Read-only rank locate, without touching `self.stack`. Caller must validate
    /// `rank < self.len()`.
    pub(crate) fn locate_by_rank(&self, rank: u64) -> NodeId {
        let mut remaining = rank + 1;
        let mut cur = self.header;

        loop {
            loop {
                let Some(next) = self.node(cur).next else { break };
                if self.node(next).is_rail() {
                    break;
                }
                let width = self.node(next).width;
                if remaining >= width {
                    remaining -= width;
                    cur = next;
                } else {
                    break;
                }
            }

            match self.node(cur).parent {
                Some(parent) => cur = parent,
                None => break,
            }
        }

        cur
    }
}
