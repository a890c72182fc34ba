#![cfg(test)]

// Property tests for ChainHashMap kept inside the crate so they can check
// structural consistency (linked_len) alongside the public API.

use crate::chain_map::ChainHashMap;
use crate::prime::is_prime;
use proptest::prelude::*;
use std::collections::HashMap;

// Ops address keys by pool index so failing cases shrink toward short
// op lists over a handful of keys.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i64),
    Remove(usize),
    Get(usize),
    Contains(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<i64>, Vec<OpI>)> {
    proptest::collection::vec(any::<i64>(), 1..=32).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i64>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            idx.prop_map(OpI::Contains),
        ];
        proptest::collection::vec(op, 1..160).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert/remove/get/contains_key return parity with the model.
// - `len` parity after every op; buckets and arena agree (`linked_len`).
// - Capacity only moves upward, and any grown capacity is prime.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: ChainHashMap<i64, i64> = ChainHashMap::new();
        let mut model: HashMap<i64, i64> = HashMap::new();
        let initial_capacity = sut.capacity();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
                }
                OpI::Remove(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.remove(&k), model.remove(&k));
                }
                OpI::Get(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                }
                OpI::Contains(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.linked_len(), sut.len());
            prop_assert!(sut.capacity() >= initial_capacity);
            prop_assert!(
                sut.capacity() == initial_capacity || is_prime(sut.capacity()),
                "grown capacity {} must be prime", sut.capacity()
            );
        }
    }
}

// Property: crossing the load threshold any number of times loses nothing.
proptest! {
    #[test]
    fn prop_growth_preserves_entries(
        keys in proptest::collection::btree_set(any::<i64>(), 50..150)
    ) {
        let mut m: ChainHashMap<i64, i64> = ChainHashMap::new();
        let before = m.capacity();
        for &k in &keys {
            m.insert(k, k.wrapping_mul(3));
        }
        prop_assert_eq!(m.len(), keys.len());
        prop_assert!(m.capacity() > before);
        prop_assert!(is_prime(m.capacity()));
        for &k in &keys {
            let want = k.wrapping_mul(3);
            prop_assert_eq!(m.get(&k), Some(&want));
        }
    }
}
