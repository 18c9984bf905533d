use proptest::prelude::*;
use std::collections::BTreeMap;

use crate::error::TrieError;
use crate::tree::BitTrie;

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>, u64),
    Remove(Vec<u8>),
    Get(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // A handful of bytes one bit apart keeps keys colliding deep inside bytes, not just at
    // byte boundaries.
    let byte = prop_oneof![
        Just(0x00u8),
        Just(0x80u8),
        Just(0x01u8),
        Just(b'a'),
        Just(b'c'),
        any::<u8>(),
    ];
    prop::collection::vec(byte, 0..=6)
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        30 => key.clone().prop_map(Op::Remove),
        20 => key.prop_map(Op::Get),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_btreemap(ops in ops_strategy()) {
        let mut t: BitTrie<u64> = BitTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for (i, op) in ops.into_iter().enumerate() {
            match op {
                Op::Insert(key, value) => {
                    if key.is_empty() {
                        prop_assert_eq!(t.insert(&key, value), Err(TrieError::EmptyKey));
                    } else {
                        let old_t = t.insert(&key, value).unwrap();
                        let old_m = m.insert(key, value);
                        prop_assert_eq!(old_t, old_m);
                    }
                }
                Op::Remove(key) => {
                    let old_t = t.remove(&key);
                    let old_m = m.remove(key.as_slice());
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Get(key) => {
                    let got_t = t.get(&key).copied();
                    let got_m = m.get(key.as_slice()).copied();
                    prop_assert_eq!(got_t, got_m);
                }
            }

            prop_assert_eq!(t.len(), m.len());
            if i % 32 == 0 {
                prop_assert_eq!(t.validate(), Ok(()));
            }
        }

        prop_assert_eq!(t.validate(), Ok(()));
        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

fn small_key_set() -> Vec<Vec<u8>> {
    vec![
        b"a".to_vec(),
        b"ab".to_vec(),
        b"ac".to_vec(),
        b"abc".to_vec(),
        vec![0x00, 0x00],
        vec![0x00, 0x80],
    ]
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = small_key_set();

    for_each_permutation(&keys, |perm| {
        let mut t: BitTrie<u64> = BitTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u64;
            assert_eq!(t.insert(&k, v).unwrap(), m.insert(k, v));
        }

        t.validate().unwrap();
        let got: Vec<(Vec<u8>, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(Vec<u8>, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(got, expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys = small_key_set();

    for_each_permutation(&keys, |perm| {
        let mut t: BitTrie<u64> = BitTrie::new();
        let mut m: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        for (i, k) in keys.iter().enumerate() {
            let v = i as u64;
            assert_eq!(t.insert(k, v).unwrap(), m.insert(k.clone(), v));
        }

        for k in perm {
            assert_eq!(t.remove(&k), m.remove(k.as_slice()));
            assert_eq!(t.len(), m.len());
            t.validate().unwrap();
            for (key, value) in &m {
                assert_eq!(t.get(key), Some(value));
            }
        }
        assert!(t.is_empty());
        assert_eq!(t.iter().count(), 0);

        // Only the two bucket anchors survive, each a single empty node.
        let stats = t.get_trie_stats();
        assert_eq!((stats.num_buckets, stats.num_nodes, stats.num_values), (2, 2, 0));
    });
}
