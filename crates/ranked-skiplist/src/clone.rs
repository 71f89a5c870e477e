//! Structural clone (spec.md §4.2.8): a fresh instance, independently reinserted.

use crate::config::SkipListConfig;
use crate::engine::Inner;
use crate::key::Key;

impl<K: Key, V: Clone> Inner<K, V> {
    /// Builds a fresh, independently-seeded instance holding the same ordered key/value content
    /// as `self`. Walks `self`'s bottom level left to right and `put`s each item into the new
    /// instance — the new instance's node heights are statistically independent of `self`'s,
    /// since `put` draws from its own freshly-seeded rng; invariant equivalence is limited to
    /// key-value content and ordering, not structure, per spec.md §4.2.8.
    pub(crate) fn clone_structure(&self) -> Self {
        let config = SkipListConfig {
            initial_capacity: self.len(),
            max_height: self.max_height(),
        };
        let mut fresh = Inner::new(self.mode(), config);

        let mut cur = self.ground_left();
        while let Some(id) = cur {
            let node = self.node(id);
            let value = node.value.clone().expect("bottom-level node always carries a value");
            fresh.put(node.key.clone(), value);
            cur = node.next.filter(|&n| !self.is_rail(n));
        }

        fresh
    }
}
