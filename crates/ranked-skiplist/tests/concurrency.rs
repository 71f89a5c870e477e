//! Thread-safety smoke test (spec.md §8 scenario 6): concurrent writers and readers sharing one
//! [`SkipList`], joined at the end to check nothing was corrupted or lost.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use ranked_skiplist::SkipList;

const STABLE_BASE: i64 = 1_000_000_000;
const STABLE_COUNT: i64 = 128;
const WRITER_THREADS: i64 = 4;
const INSERTS_PER_WRITER: i64 = 2_000;
const CHURN_BASE: i64 = 2_000_000_000;
const CHURN_COUNT: i64 = 64;

#[test]
fn concurrent_readers_and_writers() {
    let list: SkipList<i64, i64> = SkipList::new_set();

    for k in STABLE_BASE..STABLE_BASE + STABLE_COUNT {
        list.put(k, k).unwrap();
    }
    for k in CHURN_BASE..CHURN_BASE + CHURN_COUNT {
        list.put(k, k).unwrap();
    }

    let list_ref = &list;
    let keep_reading = AtomicBool::new(true);
    let keep_reading_ref = &keep_reading;

    thread::scope(|scope| {
        let reader_handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    while keep_reading_ref.load(Ordering::Relaxed) {
                        reader_step(list_ref);
                    }
                })
            })
            .collect();

        let writer_handles: Vec<_> = (0..WRITER_THREADS)
            .map(|writer_id| scope.spawn(move || writer_step(list_ref, writer_id)))
            .collect();

        for handle in writer_handles {
            handle.join().unwrap();
        }
        keep_reading_ref.store(false, Ordering::Relaxed);
        for handle in reader_handles {
            handle.join().unwrap();
        }
    });

    for k in STABLE_BASE..STABLE_BASE + STABLE_COUNT {
        assert_eq!(list.get(&k).unwrap(), Some(k));
    }
    for k in CHURN_BASE..CHURN_BASE + CHURN_COUNT {
        assert_eq!(list.get(&k).unwrap(), Some(k));
    }
}

/// Inserts a disjoint range of keys (`writer_id` selects the range), occasionally churning a key
/// in the shared churn zone via `fetchRemove` followed by reinsertion.
fn writer_step(list: &SkipList<i64, i64>, writer_id: i64) {
    let base = writer_id * (INSERTS_PER_WRITER * 10);
    for offset in 0..INSERTS_PER_WRITER {
        let k = base + offset;
        list.put(k, k).unwrap();

        if offset % 37 == 0 {
            let churn_key = CHURN_BASE + (offset % CHURN_COUNT);
            if let Some((k, v)) = list.fetch_remove(&churn_key).unwrap() {
                assert_eq!(k, v, "churn keys are always inserted as (k, k)");
                list.put(churn_key, churn_key).unwrap();
            }
        }
    }
}

/// Opens a forward iterator and checks keys never regress, then probes `get`/`contains`
/// agreement over the stable key range.
fn reader_step(list: &SkipList<i64, i64>) {
    let mut iter = list.items().unwrap();
    let mut previous: Option<i64> = None;
    while let Some((key, _)) = iter.next() {
        if let Some(prev) = previous {
            assert!(prev <= key, "bottom-level keys must never regress");
        }
        previous = Some(key);
    }
    drop(iter);

    for k in STABLE_BASE..STABLE_BASE + STABLE_COUNT {
        assert_eq!(list.get(&k).unwrap().is_some(), list.contains(&k).unwrap());
    }
}
