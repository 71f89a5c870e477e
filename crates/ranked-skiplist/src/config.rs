//! Construction-time configuration. Ambient, not a spec.md feature: every value here has a
//! default that reproduces spec.md's documented behavior exactly; tuning them only affects
//! pre-allocation and the (astronomically unlikely to matter) promotion ceiling.

/// Configuration accepted by [`crate::SkipList::with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipListConfig {
    /// Number of node slots to reserve in the cache arena up front. Purely a performance hint,
    /// mirroring the choice between `Bump::new()` and `Bump::with_capacity` the teacher crate's
    /// constructors make; does not change observable behavior.
    pub initial_capacity: usize,

    /// Ceiling on express-level promotion height. The promotion process (spec.md §4.2.2) draws
    /// uniformly from `1..=7` and continues promoting while the draw is `1`; this bounds how many
    /// times that loop can run, the same way the teacher's `MAX_HEIGHT` bounds its own geometric
    /// draw. At the default of 24, exceeding the cap happens with probability roughly
    /// `7^-24`, far below the odds of any other process-ending event.
    pub max_height: usize,
}

impl Default for SkipListConfig {
    #[inline]
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_height: 24,
        }
    }
}

impl SkipListConfig {
    /// A configuration identical to [`Self::default`] except for `initial_capacity`.
    #[inline]
    #[must_use]
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }
}
