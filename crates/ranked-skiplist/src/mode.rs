//! The `set` vs `list` duplicate-key policy (spec.md §6, §9).
//!
//! Realized as a runtime field rather than a compile-time parameter: per the Design Notes, "the
//! perf difference is one branch in hot code paths — acceptable," and a runtime field keeps the
//! public `SkipList<K, V>` type simple (one type serving both modes via its constructor).

/// Duplicate-key policy for a [`crate::SkipList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Unique keys: `put` overwrites the existing value for an equal key.
    Set,
    /// Duplicate keys allowed: `put` always inserts a new item, accumulating duplicates
    /// right-to-left in insertion order (the rightmost occurrence is the most recently inserted).
    List,
}
