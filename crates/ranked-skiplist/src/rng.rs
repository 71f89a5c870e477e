//! Per-instance random level selection (spec.md §4.2.2, §9's "per-instance, not global" note).
//!
//! Grounded in `anchored-skiplist/src/node_heights.rs`: an `oorandom::Rand32` generator, seeded
//! from OS entropy at construction, drives a geometric promotion process.

use oorandom::Rand32;


/// Draw a uniform integer in `1..=7`, continue promoting while the draw is `1` (probability `1/7`
/// per level, per spec.md §4.2.2), capped at `max_height`.
///
/// Technically `max_height` is somewhat more likely than an exact, unbounded geometric
/// distribution would predict, since what would be higher draws are capped — the same tradeoff
/// `anchored-skiplist::node_heights::random_node_height` documents for its own `MAX_HEIGHT`.
pub(crate) fn random_node_height(rng: &mut Rand32, max_height: usize) -> usize {
    let mut height = 1;
    // `rand_range` takes a half-open `Range<u32>`; `1..8` yields a uniform draw in `1..=7`.
    while height < max_height && rng.rand_range(1..8) == 1 {
        height += 1;
    }
    height
}

/// Seed a new `Rand32` from OS entropy, as spec.md §3 requires ("seeded... from an OS entropy
/// source").
pub(crate) fn seed_from_entropy() -> Rand32 {
    let mut buf = [0_u8; 8];
    // `getrandom` failing would mean the OS itself cannot supply entropy; there is no sane
    // fallback at that point, so this crate treats it the same way `oorandom`'s own examples and
    // the teacher workspace's `getrandom` usage do: an unrecoverable environment failure.
    getrandom::fill(&mut buf).expect("OS entropy source unavailable");
    Rand32::new(u64::from_le_bytes(buf))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_never_exceeds_cap() {
        let mut rng = Rand32::new(42);
        for _ in 0..10_000 {
            let h = random_node_height(&mut rng, 6);
            assert!((1..=6).contains(&h));
        }
    }

    #[test]
    fn height_is_at_least_one() {
        let mut rng = Rand32::new(7);
        assert!(random_node_height(&mut rng, 1) == 1);
    }
}
