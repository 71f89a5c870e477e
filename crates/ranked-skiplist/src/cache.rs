//! The Node Cache (spec.md §4.1): a typed object pool over a single growing arena.
//!
//! Newly requested slots come from a free list if one is available, otherwise from the end of the
//! arena. Released slots are pushed onto the head of the free list and never returned to the
//! backing `Vec` until the cache is cleared or destroyed — the classic arena-plus-freelist churn
//! pattern the Design Notes call for, adapted to a safe, index-addressed slab (see `DESIGN.md` for
//! why `acquire`/`release` differ slightly from the literal spec text).

use crate::node::{Node, NodeId};


#[derive(Debug, Clone)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    Free(Option<usize>),
}

/// A pooled allocator for [`Node`]s, backed by one arena that never shrinks except on
/// [`NodeCache::clear_all`] or [`NodeCache::destroy_pool`].
#[derive(Debug, Clone)]
pub(crate) struct NodeCache<K, V> {
    arena: Vec<Slot<K, V>>,
    free_head: Option<usize>,
    free_count: usize,
}

impl<K, V> NodeCache<K, V> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            arena: Vec::new(),
            free_head: None,
            free_count: 0,
        }
    }

    #[inline]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Vec::with_capacity(capacity),
            free_head: None,
            free_count: 0,
        }
    }

    /// Acquire a slot for `node`, reusing a freed slot if one is available, otherwise growing the
    /// arena. Amortized O(1).
    pub(crate) fn acquire(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(idx) = self.free_head {
            let next_free = match &self.arena[idx] {
                Slot::Free(next) => *next,
                Slot::Occupied(_) => unreachable!("free list pointed at an occupied slot"),
            };
            self.free_head = next_free;
            self.free_count -= 1;
            self.arena[idx] = Slot::Occupied(node);

            tracing::event!(tracing::Level::TRACE, idx, "reused freed node slot");
            NodeId(idx)
        } else {
            self.arena.push(Slot::Occupied(node));
            let idx = self.arena.len() - 1;

            if idx > 0 && (idx & (idx - 1)) == 0 {
                tracing::event!(tracing::Level::DEBUG, arena_len = self.arena.len(), "node arena grew");
            }
            NodeId(idx)
        }
    }

    /// Release the slot at `id`, pushing it onto the free list and returning the node that
    /// occupied it so the caller can decide whether to keep or drop the item it held.
    ///
    /// Constant time. Releasing a slot that is already free is a programming error (spec.md §7
    /// class 1); debug builds assert rather than silently corrupting the free list.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        let slot = std::mem::replace(&mut self.arena[id.0], Slot::Free(self.free_head));
        self.free_head = Some(id.0);
        self.free_count += 1;

        match slot {
            Slot::Occupied(node) => node,
            Slot::Free(_) => unreachable!("released a node slot that was already free"),
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K, V> {
        match &self.arena[id.0] {
            Slot::Occupied(node) => node,
            Slot::Free(_) => unreachable!("dereferenced a freed node slot"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.arena[id.0] {
            Slot::Occupied(node) => node,
            Slot::Free(_) => unreachable!("dereferenced a freed node slot"),
        }
    }

    /// Destroy every node ever served, including those on the free list, and reset the arena.
    pub(crate) fn clear_all(&mut self) {
        self.arena.clear();
        self.free_head = None;
        self.free_count = 0;
        tracing::event!(tracing::Level::DEBUG, "node cache cleared, capacity retained");
    }

    /// Tear down the arena and release its backing storage. The cache remains usable afterward
    /// (subsequent `acquire` calls simply reallocate), but all previously reserved capacity is
    /// given back to the allocator.
    pub(crate) fn destroy_pool(&mut self) {
        self.clear_all();
        self.arena.shrink_to_fit();
        tracing::event!(tracing::Level::DEBUG, "node cache arena capacity released");
    }

    #[inline]
    pub(crate) fn free_count(&self) -> usize {
        self.free_count
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn item(k: i32) -> Node<i32, i32> {
        Node::new_item(k, k * 10, 1)
    }

    #[test]
    fn acquire_grows_arena_when_free_list_empty() {
        let mut cache: NodeCache<i32, i32> = NodeCache::new();
        let a = cache.acquire(item(1));
        let b = cache.acquire(item(2));
        assert_ne!(a, b);
        assert_eq!(cache.free_count(), 0);
    }

    #[test]
    fn release_then_acquire_reuses_slot() {
        let mut cache: NodeCache<i32, i32> = NodeCache::new();
        let a = cache.acquire(item(1));
        let released = cache.release(a);
        assert_eq!(released.key, 1);
        assert_eq!(cache.free_count(), 1);

        let b = cache.acquire(item(2));
        assert_eq!(b, a, "the freed slot should be reused");
        assert_eq!(cache.free_count(), 0);
        assert_eq!(cache.get(b).key, 2);
    }

    #[test]
    fn free_list_is_lifo() {
        let mut cache: NodeCache<i32, i32> = NodeCache::new();
        let a = cache.acquire(item(1));
        let b = cache.acquire(item(2));
        cache.release(a);
        cache.release(b);
        assert_eq!(cache.free_count(), 2);

        // LIFO: b was released last, so it should be reused first.
        let reused = cache.acquire(item(3));
        assert_eq!(reused, b);
        let reused2 = cache.acquire(item(4));
        assert_eq!(reused2, a);
        assert_eq!(cache.free_count(), 0);
    }

    #[test]
    fn clear_all_resets_everything() {
        let mut cache: NodeCache<i32, i32> = NodeCache::new();
        let a = cache.acquire(item(1));
        cache.release(a);
        cache.acquire(item(2));

        cache.clear_all();
        assert_eq!(cache.free_count(), 0);

        // The arena is empty, so a fresh acquire must start again at index 0.
        let first = cache.acquire(item(5));
        assert_eq!(first, NodeId(0));
    }

    #[test]
    #[should_panic(expected = "already free")]
    fn double_release_panics_in_debug() {
        let mut cache: NodeCache<i32, i32> = NodeCache::new();
        let a = cache.acquire(item(1));
        cache.release(a);
        cache.release(a);
    }
}
