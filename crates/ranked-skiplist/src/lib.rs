//! An in-memory, ordered, order-statistic skip list.
//!
//! [`SkipList<K, V>`] maps totally-ordered keys (see [`Key`]) to values, keeping them sorted and
//! supporting rank-addressed access — "give me the value at index `i`" — alongside ordinary
//! key-addressed access, both in amortized `O(log n)`. Two duplicate-key policies are available
//! at construction: [`Mode::Set`] (unique keys, `put` overwrites) and [`Mode::List`] (duplicate
//! keys allowed, `put` always inserts).
//!
//! Every operation locks the instance's own `RwLock` internally: writers take an exclusive lock,
//! readers (including the scoped [`Iter`]/[`SliceIter`] cursors) take a shared one for their
//! lifetime. There is no global lock shared across instances.
//!
//! ```
//! use ranked_skiplist::SkipList;
//!
//! let list: SkipList<i32, &str> = SkipList::new_set();
//! list.put(3, "three").unwrap();
//! list.put(1, "one").unwrap();
//! list.put(2, "two").unwrap();
//!
//! assert_eq!(list.get(&2).unwrap(), Some("two"));
//! assert_eq!(list.get_by_index(0).unwrap(), Some("one"));
//! ```

mod cache;
mod clone;
mod config;
mod engine;
mod error;
mod iter;
mod key;
mod map;
mod mode;
mod node;
mod rng;
mod slice_iter;

pub use config::SkipListConfig;
pub use error::{Error, Result};
pub use iter::Iter;
pub use key::{Bytes, Key};
pub use map::SkipList;
pub use mode::Mode;
pub use slice_iter::SliceIter;
