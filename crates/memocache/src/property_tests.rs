//! Property-based tests for the cache structures
//!
//! Each cache is driven with random operation sequences and compared against
//! a straightforward model after every step.

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use crate::interval::{ContainsPoint, Interval};
use crate::list::RecencyList;
use crate::lru::LruCache;
use crate::range::RangeSumCache;
use crate::splay::SplayTree;

// == Strategies ==
#[derive(Debug, Clone)]
enum LruOp {
    Put(u8, u32),
    Get(u8),
    Remove(u8),
}

fn lru_op_strategy() -> impl Strategy<Value = LruOp> {
    prop_oneof![
        (0u8..32, any::<u32>()).prop_map(|(k, v)| LruOp::Put(k, v)),
        (0u8..32).prop_map(LruOp::Get),
        (0u8..32).prop_map(LruOp::Remove),
    ]
}

#[derive(Debug, Clone)]
enum ListOp {
    Push(u16),
    Remove(usize),
    MoveToFront(usize),
    RemoveLast,
}

fn list_op_strategy() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        any::<u16>().prop_map(ListOp::Push),
        any::<usize>().prop_map(ListOp::Remove),
        any::<usize>().prop_map(ListOp::MoveToFront),
        Just(ListOp::RemoveLast),
    ]
}

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i16, u32),
    Find(i16),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        (-64i16..64, any::<u32>()).prop_map(|(k, v)| TreeOp::Insert(k, v)),
        (-64i16..64).prop_map(TreeOp::Find),
    ]
}

fn interval_strategy() -> impl Strategy<Value = Interval<usize>> {
    (0usize..50, 0usize..20).prop_map(|(low, width)| Interval::new_unchecked(low, low + width))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // The list matches a Vec model front to back after every operation
    #[test]
    fn prop_list_matches_vec_model(ops in prop::collection::vec(list_op_strategy(), 1..80)) {
        let mut list = RecencyList::new();
        let mut model: Vec<(crate::list::NodeId, u16)> = Vec::new();

        for op in ops {
            match op {
                ListOp::Push(v) => {
                    let id = list.push_front(v, ());
                    model.insert(0, (id, v));
                }
                ListOp::Remove(i) if !model.is_empty() => {
                    let (id, v) = model.remove(i % model.len());
                    prop_assert_eq!(list.remove(id), Some((v, ())));
                }
                ListOp::MoveToFront(i) if !model.is_empty() => {
                    let entry = model.remove(i % model.len());
                    prop_assert!(list.move_to_front(entry.0));
                    model.insert(0, entry);
                }
                ListOp::RemoveLast => {
                    let expected = model.pop().map(|(_, v)| (v, ()));
                    prop_assert_eq!(list.remove_last(), expected);
                }
                _ => {}
            }

            let actual: Vec<u16> = list.iter().map(|(k, _)| *k).collect();
            let expected: Vec<u16> = model.iter().map(|(_, v)| *v).collect();
            prop_assert_eq!(actual, expected);
            prop_assert!(list.check_invariants().is_ok());
        }
    }

    // The cache never exceeds capacity and the index agrees with the list
    #[test]
    fn prop_lru_bound_and_consistency(
        capacity in 1usize..12,
        ops in prop::collection::vec(lru_op_strategy(), 1..150),
    ) {
        let mut cache = LruCache::new(capacity).unwrap();
        // Model: most recent first
        let mut model: Vec<(u8, u32)> = Vec::new();

        for op in ops {
            match op {
                LruOp::Put(k, v) => {
                    if let Some(pos) = model.iter().position(|(mk, _)| *mk == k) {
                        model.remove(pos);
                    } else if model.len() == capacity {
                        model.pop();
                    }
                    model.insert(0, (k, v));
                    cache.put(k, v);
                }
                LruOp::Get(k) => {
                    let expected = model.iter().position(|(mk, _)| *mk == k).map(|pos| {
                        let entry = model.remove(pos);
                        model.insert(0, entry);
                        entry.1
                    });
                    prop_assert_eq!(cache.get(&k).copied(), expected);
                }
                LruOp::Remove(k) => {
                    let expected = model
                        .iter()
                        .position(|(mk, _)| *mk == k)
                        .map(|pos| model.remove(pos).1);
                    prop_assert_eq!(cache.remove(&k), expected);
                }
            }

            prop_assert!(cache.len() <= capacity);
            prop_assert!(cache.check_invariants().is_ok());
            let order: Vec<(u8, u32)> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(&order, &model);

            let keys: HashSet<u8> = order.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(keys.len(), order.len(), "duplicate key in recency list");
        }
    }

    // Invalidation removes exactly the covering intervals and nothing else
    #[test]
    fn prop_invalidation_exact(
        intervals in prop::collection::vec(interval_strategy(), 1..40),
        point in 0usize..80,
    ) {
        let mut cache = LruCache::new(64).unwrap();
        for (i, iv) in intervals.iter().enumerate() {
            cache.put(*iv, i);
        }
        let before: Vec<(Interval<usize>, usize)> = cache.iter().map(|(k, v)| (*k, *v)).collect();

        let removed = cache.invalidate_overlapping(&point);

        let survivors: Vec<(Interval<usize>, usize)> = before
            .iter()
            .copied()
            .filter(|(k, _)| !k.contains_point(&point))
            .collect();
        let after: Vec<(Interval<usize>, usize)> = cache.iter().map(|(k, v)| (*k, *v)).collect();

        prop_assert_eq!(removed, before.len() - survivors.len());
        prop_assert_eq!(after, survivors);
        prop_assert!(cache.iter().all(|(k, _)| !k.contains_point(&point)));
        prop_assert!(cache.check_invariants().is_ok());
    }

    // In-order traversal stays sorted, found keys become the root, and
    // duplicate inserts never overwrite
    #[test]
    fn prop_splay_tree_matches_btree(ops in prop::collection::vec(tree_op_strategy(), 1..120)) {
        let mut tree = SplayTree::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                TreeOp::Insert(k, v) => {
                    let fresh = !model.contains_key(&k);
                    model.entry(k).or_insert(v);
                    prop_assert_eq!(tree.insert(k, v), fresh);
                }
                TreeOp::Find(k) => {
                    let root_before = tree.root_key().copied();
                    let found = tree.find(&k).copied();
                    prop_assert_eq!(found, model.get(&k).copied());
                    if found.is_some() {
                        prop_assert_eq!(tree.root_key(), Some(&k));
                    } else {
                        prop_assert_eq!(tree.root_key().copied(), root_before);
                    }
                }
            }

            prop_assert!(tree.check_invariants().is_ok());
            let actual: Vec<(i16, u32)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
            let expected: Vec<(i16, u32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    // Cached range sums always agree with a direct computation
    #[test]
    fn prop_range_sums_match_baseline(
        values in prop::collection::vec(-1000i64..1000, 1..40),
        queries in prop::collection::vec((any::<bool>(), any::<usize>(), any::<usize>(), -1000i64..1000), 1..60),
        capacity in 1usize..16,
    ) {
        let len = values.len();
        let mut rs = RangeSumCache::new(values, capacity).unwrap();

        for (is_update, a, b, value) in queries {
            if is_update {
                rs.update(a % len, value).unwrap();
            } else {
                let (low, high) = if a % len <= b % len { (a % len, b % len) } else { (b % len, a % len) };
                let expected = rs.range_sum_uncached(low, high).unwrap();
                prop_assert_eq!(rs.range_sum(low, high).unwrap(), expected);
            }
        }
    }
}
