#![cfg(test)]

// Property tests for BucketHashMap kept inside the crate so they can read
// structural invariants (bucket count, load factor) directly.
//
// Model: std::collections::HashMap over the same key pool. Starting from a
// single bucket forces many growth passes, so every scenario exercises the
// rehash path as well as the chain operations.

use crate::bucket_hash_map::BucketHashMap;
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(usize),
    Enumerate,
}

// Pool-indexed ops shrink toward earlier keys and shorter scenarios.
fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            idx.clone().prop_map(Op::Remove),
            idx.clone().prop_map(Op::Get),
            idx.prop_map(Op::Contains),
            Just(Op::Enumerate),
        ];
        (Just(pool), proptest::collection::vec(op, 1..200))
    })
}

proptest! {
    #[test]
    fn prop_matches_std_hashmap((pool, ops) in arb_scenario()) {
        let mut m: BucketHashMap<i32> = BucketHashMap::with_buckets(1).unwrap();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let key = &pool[i];
                    prop_assert_eq!(m.insert(key, v), model.insert(key.clone(), v));
                }
                Op::Remove(i) => {
                    let key = &pool[i];
                    prop_assert_eq!(m.remove(key), model.remove(key));
                }
                Op::Get(i) => {
                    let key = &pool[i];
                    prop_assert_eq!(m.get(key), model.get(key));
                }
                Op::Contains(i) => {
                    let key = &pool[i];
                    prop_assert_eq!(m.contains_key(key), model.contains_key(key));
                }
                Op::Enumerate => {
                    let mut got: Vec<(String, i32)> =
                        m.iter().map(|(_, k, v)| (k.to_string(), *v)).collect();
                    let mut want: Vec<(String, i32)> =
                        model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    got.sort();
                    want.sort();
                    prop_assert_eq!(got, want);
                }
            }

            // Structural invariants after every step.
            prop_assert_eq!(m.len(), model.len());
            prop_assert!(m.len() * 4 < m.bucket_count() * 3,
                "load factor must stay below the growth threshold");
        }
    }

    // Growth never loses entries: inserting n distinct keys from a single
    // bucket leaves each retrievable with its value.
    #[test]
    fn prop_growth_preserves_entries(n in 1usize..256) {
        let mut m = BucketHashMap::with_buckets(1).unwrap();
        for i in 0..n {
            m.insert(&format!("k{}", i), i);
        }
        prop_assert_eq!(m.len(), n);
        for i in 0..n {
            prop_assert_eq!(m.get(&format!("k{}", i)), Some(&i));
        }
        // Doubling from one bucket keeps the count a power of two.
        prop_assert!(m.bucket_count().is_power_of_two());
    }
}
