#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use bitrie::{BitTrie, TrieError};

#[derive(Arbitrary, Debug)]
enum MapMethod {
    Get { key: Vec<u8> },
    Insert { key: Vec<u8>, val: usize },
    Update { key: Vec<u8>, val: usize },
    Delete { key: Vec<u8> },
}

fuzz_target!(|methods: Vec<MapMethod>| {
    let mut trie = BitTrie::<usize>::new();
    let mut bt_map = BTreeMap::<Vec<u8>, usize>::new();

    for m in &methods {
        match m {
            MapMethod::Get { key } => {
                assert_eq!(trie.get(key), bt_map.get(key));
            }
            MapMethod::Insert { key, val } => {
                let t_insert = trie.insert(key, *val);
                if key.is_empty() {
                    assert_eq!(t_insert, Err(TrieError::EmptyKey));
                } else {
                    assert_eq!(t_insert, Ok(bt_map.insert(key.clone(), *val)));
                }
            }
            MapMethod::Update { key, val } => {
                let old_bt = bt_map.get_mut(key);
                let old_t = trie.get_mut(key);
                assert_eq!(old_t, old_bt);
                if let (Some(old_bt), Some(old_t)) = (old_bt, old_t) {
                    *old_bt = *val;
                    *old_t = *val;
                }
                assert_eq!(trie.get(key), bt_map.get(key));
            }
            MapMethod::Delete { key } => {
                assert_eq!(trie.remove(key), bt_map.remove(key));
            }
        }
    }

    trie.validate().unwrap();
    assert_eq!(trie.len(), bt_map.len());
    let pairs: Vec<(Vec<u8>, usize)> = trie.iter().map(|(k, v)| (k, *v)).collect();
    let expected: Vec<(Vec<u8>, usize)> = bt_map.into_iter().collect();
    assert_eq!(pairs, expected);
});
