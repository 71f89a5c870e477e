//! The bounded slice cursor of spec.md §4.2.7.
//!
//! Both of the spec's two field sets (index-bounded: `start`/`stop`/`step`/`fringe`/`step2`;
//! key-bounded: `stop == 0`/`end`/`edge`) describe the same underlying thing: a contiguous rank
//! range walked one bottom-level link at a time, emitting every `|step|`-th visited node. This
//! implementation normalizes both forms to one rank range ([`RankRange`]) up front — the
//! key-bounded form via the existing read-only `index_of_key` lookup — rather than keeping two
//! parallel state machines; see `DESIGN.md`.

use std::sync::RwLockReadGuard;

use crate::engine::Inner;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::node::NodeId;

/// A validated, normalized rank range plus step, shared by the index-bounded and key-bounded
/// forms of `getSliceByIndex`/`getSliceByKey`/`setSliceByIndex`/`setSliceByKey`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RankRange {
    start: u64,
    step: i64,
    visit_count: u64,
}

impl RankRange {
    /// Validates and normalizes `(start, stop, step)` against a list of length `len` (spec.md
    /// §4.2.7's index-bounded form): `stop` must lie in `[-len, len]` or the call errors with
    /// `InvalidStopIndex`; `step == 0` errors with `StepIndexIsZero`; an inverted range for the
    /// given step's sign errors with `StartIndexIsGreaterThanEndIndex`. `start == stop` is a
    /// valid empty range, not an error (unlike `removeSliceByIndex`'s by-index "no-op is always
    /// an error" stance; a read/write *slice* of zero items is unremarkable).
    pub(crate) fn from_index_bounds(start: i64, stop: i64, step: i64, len: u64) -> Result<Self> {
        if step == 0 {
            return Err(Error::StepIndexIsZero);
        }

        let len_i = len as i64;
        if stop < -len_i || stop > len_i {
            return Err(Error::InvalidStopIndex);
        }

        let normalize = |i: i64| if i < 0 { i + len_i } else { i };
        let start_n = normalize(start);
        if start_n < 0 || start_n > len_i {
            return Err(Error::InvalidIndex);
        }
        let mut start_n = start_n;
        let stop_n = normalize(stop);

        if (step > 0 && start_n > stop_n) || (step < 0 && start_n < stop_n) {
            return Err(Error::StartIndexIsGreaterThanEndIndex);
        }

        let visit_count = start_n.abs_diff(stop_n);
        if step < 0 && start_n == len_i && visit_count > 0 {
            // `start == len` names no node of its own; walking backward from "one past the
            // end" clamps to the last real index, the way Python's slicing does.
            start_n -= 1;
        }

        Ok(Self { start: start_n as u64, step, visit_count })
    }

    /// Translates `[start_key, stop_key)` to a rank range via `index_of_key` (spec.md §4.2.7's
    /// key-bounded form). Both keys must be present, erroring `MissingStartKey`/`MissingEndKey`
    /// otherwise.
    pub(crate) fn from_key_bounds<K: Key, V>(
        inner: &Inner<K, V>,
        start_key: &K,
        stop_key: &K,
        step: i64,
    ) -> Result<Self> {
        if step == 0 {
            return Err(Error::StepIndexIsZero);
        }
        let start_rank = inner.index_of_key(start_key).ok_or(Error::MissingStartKey)?;
        let stop_rank = inner.index_of_key(stop_key).ok_or(Error::MissingEndKey)?;
        let visit_count = start_rank.abs_diff(stop_rank);

        Ok(Self { start: start_rank, step, visit_count })
    }
}

/// Walk a validated [`RankRange`] against `inner`, overwriting every `|step|`-th visited node's
/// value with a clone of `value` (the `setter(value)` traversal of spec.md §4.2.7).
pub(crate) fn write_rank_range<K: Key, V: Clone>(inner: &mut Inner<K, V>, range: RankRange, value: V) {
    if range.visit_count == 0 {
        return;
    }

    let mut current = inner.node_ptr_by_index(range.start as i64)
        .expect("a validated, nonempty range always starts on a real node");
    let forward = range.step > 0;
    let period = range.step.unsigned_abs();
    let mut remaining = range.visit_count;
    let mut phase = 0_u64;

    while remaining > 0 {
        if phase == 0 {
            inner.node_mut(current).value = Some(value.clone());
        }
        let node = inner.node(current);
        current = if forward {
            node.next.expect("a node still within a validated range always has a next")
        } else {
            node.prev.expect("a node still within a validated range always has a prev")
        };
        remaining -= 1;
        phase = (phase + 1) % period;
    }
}

/// A bounded, steppable cursor over a `[RankRange]`, holding a shared lock for its lifetime
/// (spec.md §4.2.7). Returned by `getSliceByIndex`/`getSliceByKey`.
#[derive(Debug)]
pub struct SliceIter<'a, K, V> {
    guard: RwLockReadGuard<'a, Inner<K, V>>,
    current: NodeId,
    forward: bool,
    period: u64,
    remaining: u64,
    phase: u64,
}

impl<'a, K: Key, V: Clone> SliceIter<'a, K, V> {
    pub(crate) fn new(guard: RwLockReadGuard<'a, Inner<K, V>>, range: RankRange) -> Self {
        let current = if range.visit_count == 0 {
            // Never dereferenced: `remaining` is already 0, so `next()` returns `None` at once.
            guard.bottom_header()
        } else {
            guard.node_ptr_by_index(range.start as i64)
                .expect("a validated, nonempty range always starts on a real node")
        };

        Self {
            guard,
            current,
            forward: range.step > 0,
            period: range.step.unsigned_abs(),
            remaining: range.visit_count,
            phase: 0,
        }
    }

    /// Advance to the next qualifying node (every `|step|`-th visited node) and return its item,
    /// or `None` once `stop` has been reached.
    pub fn next(&mut self) -> Option<(K, V)> {
        while self.remaining > 0 {
            let node = self.guard.node(self.current);
            let item = (self.phase == 0).then(|| {
                (node.key.clone(), node.value.clone().expect("bottom-level node always carries a value"))
            });

            self.current = if self.forward {
                node.next.expect("a node still within bounds always has a next")
            } else {
                node.prev.expect("a node still within bounds always has a prev")
            };
            self.remaining -= 1;
            self.phase = (self.phase + 1) % self.period;

            if item.is_some() {
                return item;
            }
        }
        None
    }
}
