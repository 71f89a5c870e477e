//! The node graph's vocabulary types: [`NodeId`] (a stable slab index) and [`Node`] itself.
//!
//! Per the Design Notes (spec.md §9), the pointer-heavy, back-referencing node graph is realized
//! with a single owning arena ([`crate::cache::NodeCache`]) and nodes referenced by stable index
//! rather than by raw pointer — no `unsafe` is needed anywhere in this crate.

/// A stable index into a [`crate::cache::NodeCache`]'s arena.
///
/// `NodeId`s are only meaningful with respect to the `NodeCache` that produced them; nothing
/// prevents using one against the wrong cache at the type level; the map's single-`NodeCache`
/// construction is what keeps this sound in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub(crate) struct NodeId(pub(crate) usize);

/// A link to a neighboring node: `None` where spec.md's Node record has a null reference.
pub(crate) type Link = Option<NodeId>;

/// One node in the graph: a header/trailer rail node, a bottom-level item carrying the
/// authoritative value, or an express-level copy of an item (one per level it was promoted to).
///
/// Only the bottom-level copy of an item carries `value: Some(_)`; express-level copies of the
/// same item carry `value: None` just like rail nodes do, so `is_rail` is its own flag rather than
/// being inferred from `value` — both "no value" cases need to coexist and be told apart.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: Option<V>,
    /// Right neighbor on this node's own level.
    pub(crate) next: Link,
    /// Left neighbor on this node's own level.
    pub(crate) prev: Link,
    /// The node representing the same item one level down; `None` on the bottom level.
    pub(crate) parent: Link,
    /// Rank distance, in bottom-level items, spanned by the link arriving at this node from its
    /// left neighbor on this same level. Always `1` on the bottom level for real nodes. Never
    /// meaningful for the trailer (its incoming width is never tracked).
    pub(crate) width: u64,
    rail: bool,
}

impl<K, V> Node<K, V> {
    #[inline]
    pub(crate) fn new_rail(key: K, parent: Link) -> Self {
        Self {
            key,
            value: None,
            next: None,
            prev: None,
            parent,
            width: 0,
            rail: true,
        }
    }

    /// A bottom-level item node, carrying the authoritative value.
    #[inline]
    pub(crate) fn new_item(key: K, value: V, width: u64) -> Self {
        Self {
            key,
            value: Some(value),
            next: None,
            prev: None,
            parent: None,
            width,
            rail: false,
        }
    }

    /// An express-level copy of an already-inserted item: same key, no value of its own, linked
    /// down to the copy one level below via `parent`.
    #[inline]
    pub(crate) fn new_express(key: K, parent: Link, width: u64) -> Self {
        Self {
            key,
            value: None,
            next: None,
            prev: None,
            parent,
            width,
            rail: false,
        }
    }

    #[inline]
    pub(crate) fn is_rail(&self) -> bool {
        self.rail
    }
}
