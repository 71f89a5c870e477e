//! The public [`SkipList`] facade (spec.md §6): a per-instance `RwLock<Inner<K, V>>`, exclusive
//! for writers, shared for readers, per spec.md §5's concurrency model.

use std::cmp::Ordering;
use std::sync::RwLock;

use crate::config::SkipListConfig;
use crate::engine::Inner;
use crate::error::{Error, Result};
use crate::iter::Iter;
use crate::key::Key;
use crate::mode::Mode;
use crate::slice_iter::{write_rank_range, RankRange, SliceIter};

/// An in-memory, ordered, order-statistic skip list mapping totally-ordered keys to values.
///
/// Construct with [`SkipList::new_set`] (unique keys; `put` overwrites an existing key's value)
/// or [`SkipList::new_list`] (duplicate keys allowed; `put` always inserts, accumulating
/// duplicates in insertion order). See the crate-level docs for the full operation list.
#[derive(Debug)]
pub struct SkipList<K, V> {
    inner: RwLock<Inner<K, V>>,
}

impl<K: Key, V> SkipList<K, V> {
    /// A new, empty `set`-mode instance: unique keys, `put` overwrites.
    #[must_use]
    pub fn new_set() -> Self {
        Self::with_config(Mode::Set, SkipListConfig::default())
    }

    /// A new, empty `list`-mode instance: duplicate keys allowed, `put` always inserts.
    #[must_use]
    pub fn new_list() -> Self {
        Self::with_config(Mode::List, SkipListConfig::default())
    }

    /// A new, empty instance with explicit construction-time tuning (spec.md §6's
    /// `init(allocator)`, generalized to this crate's ambient [`SkipListConfig`]).
    #[must_use]
    pub fn with_config(mode: Mode, config: SkipListConfig) -> Self {
        Self { inner: RwLock::new(Inner::new(mode, config)) }
    }

    /// The number of items currently stored.
    pub fn len(&self) -> Result<usize> {
        Ok(self.inner.read()?.len())
    }

    /// Whether the list holds no items.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// The `set`/`list` duplicate-key policy this instance was constructed with.
    pub fn mode(&self) -> Result<Mode> {
        Ok(self.inner.read()?.mode())
    }

    /// Release every real node to the cache's free list and reinitialize as empty. The cache's
    /// backing arena capacity is preserved (spec.md §4.3).
    pub fn clear_retaining_capacity(&self) -> Result<()> {
        self.inner.write()?.clear_retaining_capacity();
        Ok(())
    }

    /// Destroy every node, releasing the cache arena's capacity too, then reinitialize as empty
    /// (spec.md §4.3).
    pub fn clear_and_reset(&self) -> Result<()> {
        self.inner.write()?.clear_and_reset();
        Ok(())
    }

    // ---- Point writes (spec.md §6) -------------------------------------------------------

    /// Insert `key`/`value`. In `set` mode, an existing equal key has its value overwritten;
    /// in `list` mode, a new item is always inserted. Returns `true` if a new item was inserted.
    ///
    /// # Panics (debug builds only)
    /// If `key` is the type's sentinel value (spec.md §7 class 1: a programming error, never
    /// produced by an admissible key).
    pub fn put(&self, key: K, value: V) -> Result<bool> {
        debug_assert!(!key.is_sentinel(), "sentinel key is never a valid insertion");
        Ok(self.inner.write()?.put(key, value))
    }

    /// Overwrite the value at an existing `key` without inserting. Returns whether `key` was
    /// present.
    pub fn update(&self, key: &K, value: V) -> Result<bool> {
        Ok(self.inner.write()?.update(key, value))
    }

    /// Overwrite the value at `index` (negative indices count from the end). Returns whether
    /// `index` was in range.
    pub fn update_by_index(&self, index: i64, value: V) -> Result<bool> {
        Ok(self.inner.write()?.update_by_index(index, value))
    }

    // ---- Range writes (spec.md §6) -------------------------------------------------------

    /// Overwrite every `|step|`-th item's value with `value` across the half-open key range
    /// `[start_key, stop_key)`. Both keys must be present.
    pub fn set_slice_by_key(&self, start_key: &K, stop_key: &K, step: i64, value: V) -> Result<()>
    where
        V: Clone,
    {
        let mut guard = self.inner.write()?;
        let range = RankRange::from_key_bounds(&guard, start_key, stop_key, step)?;
        write_rank_range(&mut guard, range, value);
        Ok(())
    }

    /// Overwrite every `|step|`-th item's value with `value` across the half-open index range
    /// `[start, stop)` (negative indices count from the end).
    pub fn set_slice_by_index(&self, start: i64, stop: i64, step: i64, value: V) -> Result<()>
    where
        V: Clone,
    {
        let mut guard = self.inner.write()?;
        let range = RankRange::from_index_bounds(start, stop, step, guard.len() as u64)?;
        write_rank_range(&mut guard, range, value);
        Ok(())
    }

    // ---- Point reads (spec.md §6) ---------------------------------------------------------

    /// The value at `key` (the rightmost occurrence, in `list` mode), if present.
    pub fn get(&self, key: &K) -> Result<Option<V>>
    where
        V: Clone,
    {
        Ok(self.get_item(key)?.map(|(_, v)| v))
    }

    /// The `(key, value)` pair at `key` (the rightmost occurrence, in `list` mode), if present.
    pub fn get_item(&self, key: &K) -> Result<Option<(K, V)>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        let (node, _) = guard.locate_floor(key);
        if guard.is_rail(node) {
            return Ok(None);
        }
        let found = guard.node(node);
        if !matches!(found.key.key_cmp(key), Ordering::Equal) {
            return Ok(None);
        }
        Ok(Some((found.key.clone(), found.value.clone().expect("bottom-level node always carries a value"))))
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &K) -> Result<bool> {
        let guard = self.inner.read()?;
        let (node, _) = guard.locate_floor(key);
        Ok(!guard.is_rail(node) && matches!(guard.node(node).key.key_cmp(key), Ordering::Equal))
    }

    /// The value at `index` (negative indices count from the end), if in range.
    pub fn get_by_index(&self, index: i64) -> Result<Option<V>>
    where
        V: Clone,
    {
        Ok(self.get_item_by_index(index)?.map(|(_, v)| v))
    }

    /// The `(key, value)` pair at `index` (negative indices count from the end), if in range.
    pub fn get_item_by_index(&self, index: i64) -> Result<Option<(K, V)>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        let Some(node) = guard.node_ptr_by_index(index) else { return Ok(None) };
        let found = guard.node(node);
        Ok(Some((found.key.clone(), found.value.clone().expect("bottom-level node always carries a value"))))
    }

    /// The 0-based rank of the rightmost occurrence of `key`, if present.
    pub fn get_item_index_by_key(&self, key: &K) -> Result<Option<u64>> {
        Ok(self.inner.read()?.index_of_key(key))
    }

    /// The item at index 0, if the list is nonempty.
    pub fn get_first(&self) -> Result<Option<(K, V)>>
    where
        V: Clone,
    {
        self.get_item_by_index(0)
    }

    /// The item at index `-1`, if the list is nonempty.
    pub fn get_last(&self) -> Result<Option<(K, V)>>
    where
        V: Clone,
    {
        self.get_item_by_index(-1)
    }

    /// The item at index 0 (the smallest key), if the list is nonempty. Alias of
    /// [`SkipList::get_first`] kept for the vocabulary of spec.md §8's boundary laws.
    pub fn min(&self) -> Result<Option<(K, V)>>
    where
        V: Clone,
    {
        self.get_first()
    }

    /// The item at index `-1` (the largest key), if the list is nonempty. Alias of
    /// [`SkipList::get_last`].
    pub fn max(&self) -> Result<Option<(K, V)>>
    where
        V: Clone,
    {
        self.get_last()
    }

    /// The item at index `floor(size / 2)` (spec.md §8's median rule), if the list is nonempty.
    pub fn median(&self) -> Result<Option<(K, V)>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        if guard.len() == 0 {
            return Ok(None);
        }
        let mid = (guard.len() / 2) as i64;
        let node = guard.node_ptr_by_index(mid).expect("floor(size/2) is always in range for a nonempty list");
        let found = guard.node(node);
        Ok(Some((found.key.clone(), found.value.clone().expect("bottom-level node always carries a value"))))
    }

    // ---- Point removal (spec.md §6) -------------------------------------------------------

    /// Remove `key`, dropping its value. Returns whether it was present.
    pub fn remove(&self, key: &K) -> Result<bool> {
        Ok(self.inner.write()?.remove_by_key(key).is_some())
    }

    /// Remove the item at `index` (negative indices count from the end), dropping its value.
    /// Returns whether `index` was in range.
    pub fn remove_by_index(&self, index: i64) -> Result<bool> {
        let mut guard = self.inner.write()?;
        let Some(rank) = guard.normalize_index(index) else { return Ok(false) };
        guard.remove_by_rank(rank);
        Ok(true)
    }

    /// Remove and return `key`'s `(key, value)` pair, if present.
    pub fn fetch_remove(&self, key: &K) -> Result<Option<(K, V)>> {
        let key_clone = key.clone();
        Ok(self.inner.write()?.remove_by_key(key).map(|value| (key_clone, value)))
    }

    /// Remove and return the `(key, value)` pair at `index` (negative indices count from the
    /// end), if in range.
    pub fn fetch_remove_by_index(&self, index: i64) -> Result<Option<(K, V)>> {
        let mut guard = self.inner.write()?;
        let Some(rank) = guard.normalize_index(index) else { return Ok(None) };
        let node = guard.node_ptr_by_index(index).expect("just normalized");
        let key = guard.node(node).key.clone();
        let value = guard.remove_by_rank(rank);
        Ok(Some((key, value)))
    }

    /// Remove and return the last item (index `size - 1`), if the list is nonempty. Spec.md §9
    /// resolves the `pop()`/`fetchRemoveByIndex(size)` ambiguity in favor of `size - 1`.
    pub fn pop(&self) -> Result<Option<(K, V)>> {
        self.fetch_remove_by_index(-1)
    }

    /// Remove and return the first item (index 0), if the list is nonempty.
    pub fn pop_first(&self) -> Result<Option<(K, V)>> {
        self.fetch_remove_by_index(0)
    }

    // ---- Range removal (spec.md §6) -------------------------------------------------------

    /// Remove the half-open key range `[start_key, stop_key)`. A no-op (`Ok(false)`) when
    /// `start_key == stop_key`; both endpoints must otherwise be present.
    pub fn remove_slice_by_key(&self, start_key: &K, stop_key: &K) -> Result<bool> {
        self.inner.write()?.remove_slice_by_key(start_key, stop_key)
    }

    /// Remove the half-open index range `[start, stop)` (negative indices count from the end).
    /// `Ok(false)` when `start >= size`; `start == stop` (after normalizing) is `InvalidIndex`.
    pub fn remove_slice_by_index(&self, start: i64, stop: i64) -> Result<bool> {
        self.inner.write()?.remove_slice_by_index(start, stop)
    }

    // ---- Iteration (spec.md §6) -----------------------------------------------------------

    /// A forward cursor anchored at the first item, holding a shared lock for its lifetime.
    pub fn items(&self) -> Result<Iter<'_, K, V>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        let anchor = guard.ground_left().unwrap_or_else(|| guard.bottom_header());
        Ok(Iter::new(guard, anchor))
    }

    /// A cursor anchored at the last item (call `.prev()` to walk backward), holding a shared
    /// lock for its lifetime.
    pub fn items_reversed(&self) -> Result<Iter<'_, K, V>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        let anchor = guard.ground_right().unwrap_or_else(|| guard.bottom_trailer());
        Ok(Iter::new(guard, anchor))
    }

    /// A cursor anchored at `key` (the rightmost occurrence, in `list` mode), holding a shared
    /// lock for its lifetime. Errors `MissingKey` if absent.
    pub fn iter_by_key(&self, key: &K) -> Result<Iter<'_, K, V>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        let (node, _) = guard.locate_floor(key);
        let matches_key = !guard.is_rail(node) && matches!(guard.node(node).key.key_cmp(key), Ordering::Equal);
        if !matches_key {
            return Err(Error::MissingKey);
        }
        Ok(Iter::new(guard, node))
    }

    /// A cursor anchored at `index` (negative indices count from the end), holding a shared lock
    /// for its lifetime. Errors `InvalidIndex` if out of range.
    pub fn iter_by_index(&self, index: i64) -> Result<Iter<'_, K, V>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        let Some(node) = guard.node_ptr_by_index(index) else { return Err(Error::InvalidIndex) };
        Ok(Iter::new(guard, node))
    }

    // ---- Slices (spec.md §6) --------------------------------------------------------------

    /// A bounded, steppable cursor over the half-open key range `[start_key, stop_key)`, holding
    /// a shared lock for its lifetime. Both keys must be present.
    pub fn get_slice_by_key(&self, start_key: &K, stop_key: &K, step: i64) -> Result<SliceIter<'_, K, V>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        let range = RankRange::from_key_bounds(&guard, start_key, stop_key, step)?;
        Ok(SliceIter::new(guard, range))
    }

    /// A bounded, steppable cursor over the half-open index range `[start, stop)` (negative
    /// indices count from the end), holding a shared lock for its lifetime.
    pub fn get_slice_by_index(&self, start: i64, stop: i64, step: i64) -> Result<SliceIter<'_, K, V>>
    where
        V: Clone,
    {
        let guard = self.inner.read()?;
        let range = RankRange::from_index_bounds(start, stop, step, guard.len() as u64)?;
        Ok(SliceIter::new(guard, range))
    }
}

impl<K: Key, V: Clone> Clone for SkipList<K, V> {
    /// Structural clone (spec.md §4.2.8): a fresh instance with its own cache, rng, and lock,
    /// built by walking `self`'s bottom level under a shared lock and re-inserting every item.
    /// Mutating either instance afterward leaves the other unchanged.
    fn clone(&self) -> Self {
        let guard = self.inner.read().expect("a poisoned lock makes cloning meaningless too");
        Self { inner: RwLock::new(guard.clone_structure()) }
    }
}
