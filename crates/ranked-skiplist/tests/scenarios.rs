//! End-to-end scenarios (spec.md §8) exercised through the public [`SkipList`] facade.

use ranked_skiplist::{Bytes, Error, Key, SkipList};

fn populate_set(keys: impl IntoIterator<Item = i32>) -> SkipList<i32, i32> {
    let list = SkipList::new_set();
    for k in keys {
        list.put(k, k * 10).unwrap();
    }
    list
}

fn collect_items<K: Key, V: Clone>(iter: &mut ranked_skiplist::Iter<'_, K, V>) -> Vec<(K, V)> {
    let mut items = Vec::new();
    while let Some(item) = iter.next() {
        items.push(item);
    }
    items
}

#[test]
fn integer_set_round_trip() {
    let list: SkipList<i32, i32> = SkipList::new_set();
    list.put(5, 50).unwrap();
    list.put(2, 20).unwrap();
    list.put(8, 80).unwrap();
    list.put(2, 22).unwrap();

    assert_eq!(list.len().unwrap(), 3);

    let mut iter = list.items().unwrap();
    assert_eq!(collect_items(&mut iter), vec![(2, 22), (5, 50), (8, 80)]);
    drop(iter);

    assert_eq!(list.get_item_index_by_key(&5).unwrap(), Some(1));
    assert_eq!(list.median().unwrap(), Some((5, 50)));
}

#[test]
fn list_mode_duplicates() {
    let list: SkipList<i32, i32> = SkipList::new_list();
    list.put(1, 1).unwrap();
    list.put(5, 100).unwrap();
    list.put(5, 200).unwrap();
    list.put(5, 300).unwrap();
    list.put(9, 9).unwrap();

    assert_eq!(list.len().unwrap(), 5);
    assert_eq!(list.get(&5).unwrap(), Some(300));
    assert_eq!(list.get_item_index_by_key(&5).unwrap(), Some(3));

    let mut iter = list.items().unwrap();
    assert_eq!(
        collect_items(&mut iter),
        vec![(1, 1), (5, 100), (5, 200), (5, 300), (9, 9)],
    );
    drop(iter);

    assert_eq!(list.fetch_remove(&5).unwrap(), Some((5, 300)));
    assert_eq!(list.fetch_remove(&5).unwrap(), Some((5, 200)));
    assert_eq!(list.remove(&5).unwrap(), true);
    assert_eq!(list.remove(&5).unwrap(), false);
}

#[test]
fn range_removal_by_key() {
    let list = populate_set(0..6);

    assert_eq!(list.remove_slice_by_key(&1, &4).unwrap(), true);
    assert_eq!(list.len().unwrap(), 3);
    assert!(list.contains(&0).unwrap());
    assert!(list.contains(&4).unwrap());
    assert!(list.contains(&5).unwrap());
    for k in 1..4 {
        assert!(!list.contains(&k).unwrap());
    }
}

#[test]
fn range_removal_by_key_errors() {
    let list = populate_set(0..6);

    assert_eq!(list.remove_slice_by_key(&4, &2).unwrap_err(), Error::StartKeyIsGreaterThanEndKey);
    assert_eq!(list.remove_slice_by_key(&99, &100).unwrap_err(), Error::MissingStartKey);
    assert_eq!(list.remove_slice_by_key(&2, &99).unwrap_err(), Error::MissingEndKey);
}

#[test]
fn sliced_index_read() {
    let list = populate_set(0..10);

    let mut slice = list.get_slice_by_index(8, 10, 2).unwrap();
    assert_eq!(slice.next(), Some((8, 80)));
    assert_eq!(slice.next(), None);
    drop(slice);

    assert_eq!(list.get_slice_by_index(0, 999, 1).unwrap_err(), Error::InvalidStopIndex);

    list.set_slice_by_index(0, 5, 1, 99).unwrap();
    let mut iter = list.items().unwrap();
    let items = collect_items(&mut iter);
    let expected: Vec<(i32, i32)> = (0..5).map(|k| (k, 99)).chain((5..10).map(|k| (k, k * 10))).collect();
    assert_eq!(items, expected);
}

#[test]
fn string_key_lexicographic_order_and_iterator_lag() {
    let list: SkipList<Bytes, i32> = SkipList::new_set();
    list.put(Bytes::from("delta"), 4).unwrap();
    list.put(Bytes::from("alpha"), 1).unwrap();
    list.put(Bytes::from("charlie"), 3).unwrap();
    list.put(Bytes::from("bravo"), 2).unwrap();

    let mut iter = list.items().unwrap();
    let values: Vec<i32> = collect_items(&mut iter).into_iter().map(|(_, v)| v).collect();
    assert_eq!(values, vec![1, 2, 3, 4]);
    drop(iter);

    let mut cursor = list.iter_by_key(&Bytes::from("delta")).unwrap();
    assert_eq!(cursor.prev().unwrap().1, 4);
    assert_eq!(cursor.prev().unwrap().1, 3);
    assert_eq!(cursor.prev().unwrap().1, 2);
    assert_eq!(cursor.next().unwrap().1, 1);
}

/// Not one of the seed scenarios, but the only exercise of `getSliceByKey`/`setSliceByKey`
/// (spec.md §6) in the absence of duplicate keys, where the anchor is unambiguous.
#[test]
fn slice_by_key_in_set_mode() {
    let list = populate_set(0..10);

    let mut slice = list.get_slice_by_key(&2, &6, 1).unwrap();
    assert_eq!(slice.next(), Some((2, 20)));
    assert_eq!(slice.next(), Some((3, 30)));
    assert_eq!(slice.next(), Some((4, 40)));
    assert_eq!(slice.next(), Some((5, 50)));
    assert_eq!(slice.next(), None);
    drop(slice);

    list.set_slice_by_key(&2, &6, 1, -1).unwrap();
    for k in 2..6 {
        assert_eq!(list.get(&k).unwrap(), Some(-1));
    }
    assert_eq!(list.get(&6).unwrap(), Some(60));
}

#[test]
fn empty_map_boundary_reads() {
    let list: SkipList<i32, i32> = SkipList::new_set();
    assert_eq!(list.get_first().unwrap(), None);
    assert_eq!(list.get_last().unwrap(), None);
    assert_eq!(list.min().unwrap(), None);
    assert_eq!(list.max().unwrap(), None);
    assert_eq!(list.median().unwrap(), None);
    assert!(!list.contains(&0).unwrap());
    assert_eq!(list.fetch_remove(&0).unwrap(), None);
    assert_eq!(list.pop().unwrap(), None);
}

#[test]
fn single_element_map_min_max_median_agree() {
    let list = populate_set(std::iter::once(7));
    let item = Some((7, 70));
    assert_eq!(list.min().unwrap(), item);
    assert_eq!(list.max().unwrap(), item);
    assert_eq!(list.median().unwrap(), item);
}

#[test]
fn negative_indexing() {
    let list = populate_set(0..5);
    assert_eq!(list.get_by_index(-1).unwrap(), list.get_last().unwrap());
    assert_eq!(list.get_by_index(-5).unwrap(), list.get_first().unwrap());
    assert_eq!(list.get_by_index(-6).unwrap(), None);
    assert_eq!(list.get_by_index(5).unwrap(), None);
}

#[test]
fn remove_slice_by_index_start_equals_stop_is_invalid() {
    let list = populate_set(0..5);
    assert_eq!(list.remove_slice_by_index(2, 2).unwrap_err(), Error::InvalidIndex);
}

#[test]
fn fetch_remove_by_index_zero_drains_the_list() {
    let list = populate_set(0..5);
    for expected_key in 0..5 {
        let (key, value) = list.fetch_remove_by_index(0).unwrap().unwrap();
        assert_eq!(key, expected_key);
        assert_eq!(value, expected_key * 10);
    }
    assert_eq!(list.fetch_remove_by_index(0).unwrap(), None);
    assert!(list.is_empty().unwrap());
}

#[test]
fn clone_is_independent() {
    let list = populate_set(0..5);
    let cloned = list.clone();

    list.put(100, 1000).unwrap();
    assert!(!cloned.contains(&100).unwrap());

    let mut iter = cloned.items().unwrap();
    let items = collect_items(&mut iter);
    assert_eq!(items, (0..5).map(|k| (k, k * 10)).collect::<Vec<_>>());
}
