//! Error taxonomy for fallible public operations.
//!
//! Follows the style of `anchored-leveldb/src/format.rs`: small, specific
//! [`thiserror::Error`]-derived variants rather than a single opaque string.

use thiserror::Error;


/// The crate-wide `Result` alias used by every fallible public operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Expected domain errors (spec.md §6/§7 class 2), plus [`Error::LockPoisoned`], the one variant
/// added by the expanded spec purely because `std::sync::RwLock` can be poisoned where the
/// original host language's lock primitive could not.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A range-by-key operation's `start_key` compared greater than its `stop_key`.
    #[error("start key is greater than stop key")]
    StartKeyIsGreaterThanEndKey,

    /// A range-by-index operation's `start` compared greater than its `stop` after normalizing
    /// negative indices.
    #[error("start index is greater than stop index")]
    StartIndexIsGreaterThanEndIndex,

    /// A point operation's key was not present.
    #[error("key not found")]
    MissingKey,

    /// A range-by-key operation's `start_key` was not present.
    #[error("start key not found")]
    MissingStartKey,

    /// A range-by-key operation's `stop_key` was not present.
    #[error("stop key not found")]
    MissingEndKey,

    /// An index was out of the admissible `[-size, size)` range for a point operation, or
    /// `start == stop` was given to `removeSliceByIndex` (an empty range by index is an error,
    /// unlike an empty range by key, which is a no-op; see `DESIGN.md`).
    #[error("index is out of range or invalid")]
    InvalidIndex,

    /// A range-by-index operation's `stop` was outside `[-size, size]`.
    #[error("stop index is out of range")]
    InvalidStopIndex,

    /// A slice operation's `step` was zero.
    #[error("step must not be zero")]
    StepIndexIsZero,

    /// The per-instance `RwLock` was poisoned by a writer that panicked while holding it.
    #[error("the skiplist's lock was poisoned by a panicking writer")]
    LockPoisoned,
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    #[inline]
    fn from(_err: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}
