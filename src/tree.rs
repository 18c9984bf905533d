//! Bitwise radix trie.
//!
//! This module contains [`BitTrie`], the top-level index: 256 independent bit tries, one per
//! possible first key byte. All bit-level work is delegated to the node module.

use std::fmt::Debug;

use tracing::trace;

use crate::error::{Result, TrieError};
use crate::iter::Iter;
use crate::keys::Key;
use crate::node::{Node, PathSplit};
use crate::stats::{update_trie_stats, TrieStats};
use crate::utils::bits::{clear_high_bits, clear_low_bits, key_bit, span_bytes};

/// A PATRICIA-style trie over the bits of byte-string keys.
///
/// Keys are bucketed by their first byte. Inside a bucket every node stores a run of bits (its
/// segment) rather than whole bytes, so two keys share structure down to the exact bit where they
/// diverge.
///
/// ## Examples
///
/// ```rust
/// use bitrie::BitTrie;
///
/// let mut trie = BitTrie::new();
/// trie.insert("ab", 1).unwrap();
/// trie.insert("abc", 2).unwrap();
///
/// assert_eq!(trie.get("ab"), Some(&1));
/// assert_eq!(trie.get("abc"), Some(&2));
/// assert_eq!(trie.get("a"), None);
///
/// assert_eq!(trie.remove("ab"), Some(1));
/// assert_eq!(trie.get("abc"), Some(&2));
/// ```
///
/// The trie has no internal locking. Wrap it in a lock to share it between threads.
pub struct BitTrie<V> {
    roots: [Option<Box<Node<V>>>; 256],
    len: usize,
}

impl<V> Default for BitTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> BitTrie<V> {
    pub fn new() -> Self {
        Self {
            roots: std::array::from_fn(|_| None),
            len: 0,
        }
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.roots.iter_mut().for_each(|root| *root = None);
        self.len = 0;
    }

    /// Look up a key.
    pub fn get<K: Key + ?Sized>(&self, key: &K) -> Option<&V> {
        let key = key.as_slice();
        let key_end = key.len() * 8;
        let mut cur = self.roots[*key.first()? as usize].as_deref()?;
        let mut pos = 0;
        loop {
            pos = cur.path_compare(key, pos)?;
            if pos == key_end {
                return cur.value.as_ref();
            }
            cur = cur.child(key_bit(key, pos))?;
        }
    }

    /// Look up a key for modification in place.
    pub fn get_mut<K: Key + ?Sized>(&mut self, key: &K) -> Option<&mut V> {
        let key = key.as_slice();
        let key_end = key.len() * 8;
        let mut cur = self.roots[*key.first()? as usize].as_deref_mut()?;
        let mut pos = 0;
        loop {
            pos = cur.path_compare(key, pos)?;
            if pos == key_end {
                return cur.value.as_mut();
            }
            cur = cur.child_mut(key_bit(key, pos))?;
        }
    }

    pub fn contains_key<K: Key + ?Sized>(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert a key-value pair.
    ///
    /// Returns the value previously stored under the key, if any. Zero-length keys are rejected
    /// with [`TrieError::EmptyKey`].
    pub fn insert<K: Key + ?Sized>(&mut self, key: &K, value: V) -> Result<Option<V>> {
        let key = key.as_slice();
        let Some(&first) = key.first() else {
            return Err(TrieError::EmptyKey);
        };

        let slot = &mut self.roots[first as usize];
        let root = match slot {
            None => {
                trace!(bucket = first, bits = key.len() * 8, "new bucket");
                *slot = Some(Box::new(Node::new_leaf(key, 0, value)));
                self.len += 1;
                return Ok(None);
            }
            Some(root) if root.value.is_none() && root.is_leaf() => {
                // Only the anchor of a bucket emptied by deletes is left; reuse it.
                trace!(bucket = first, bits = key.len() * 8, "reusing empty bucket root");
                **root = Node::new_leaf(key, 0, value);
                self.len += 1;
                return Ok(None);
            }
            Some(root) => root,
        };

        let mut cur: &mut Node<V> = root;
        let mut pos = 0;
        let mut value = value;
        loop {
            match cur.path_split(key, pos, value) {
                PathSplit::Inserted(old) => {
                    if old.is_none() {
                        self.len += 1;
                    }
                    return Ok(old);
                }
                PathSplit::Descend { next, value: v } => {
                    value = v;
                    pos = next;
                    cur = match cur.child_mut(key_bit(key, pos)) {
                        Some(child) => child,
                        None => unreachable!("descend without a child at bit {pos}"),
                    };
                }
            }
        }
    }

    /// Remove a key.
    ///
    /// Returns the removed value. Removing an absent key changes nothing. Whatever branching the
    /// key needed is folded back: a detached leaf's parent, or the matched node itself, is merged
    /// with its only remaining child. A bucket root is never freed, only emptied.
    pub fn remove<K: Key + ?Sized>(&mut self, key: &K) -> Option<V> {
        let key = key.as_slice();
        let key_end = key.len() * 8;
        let first = *key.first()?;
        let root = self.roots[first as usize].as_deref_mut()?;

        let mut pos = root.path_compare(key, 0)?;
        if pos == key_end {
            let old = root.value.take()?;
            root.path_merge(0);
            debug_assert!(!root.is_mergeable());
            self.len -= 1;
            return Some(old);
        }

        // `cur` starts at `start`; its matched segment ends at `pos`.
        let mut cur: &mut Node<V> = root;
        let mut start = 0;
        loop {
            let bit = key_bit(key, pos);
            let child_end = cur.child(bit)?.path_compare(key, pos)?;
            if child_end == key_end {
                let child = cur.child_mut(bit)?;
                let old = child.value.take()?;
                if child.is_leaf() {
                    trace!(at = pos, "detaching leaf");
                    cur.take_child(bit);
                    cur.path_merge(start);
                    debug_assert!(!cur.is_mergeable());
                } else {
                    child.path_merge(pos);
                    debug_assert!(!child.is_mergeable());
                }
                self.len -= 1;
                return Some(old);
            }

            start = pos;
            pos = child_end;
            cur = cur.child_mut(bit)?;
        }
    }

    /// Iterate over all key-value pairs, in lexicographic key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.roots)
    }

    /// Gather structural statistics over every bucket.
    pub fn get_trie_stats(&self) -> TrieStats {
        let mut stats = TrieStats::default();
        for root in self.roots.iter().flatten() {
            stats.num_buckets += 1;
            let mut stack = vec![(root.as_ref(), 1)];
            while let Some((node, height)) = stack.pop() {
                update_trie_stats(&mut stats, node, height);
                for (_, child) in node.children() {
                    stack.push((child, height + 1));
                }
            }
        }
        stats
    }

    /// Walks every bucket and checks the structural invariants the split and merge algorithms
    /// maintain. Cost is linear in the number of nodes.
    pub fn validate(&self) -> Result<()> {
        let mut values = 0;
        for (bucket, root) in self.roots.iter().enumerate() {
            let Some(root) = root.as_deref() else {
                continue;
            };
            let bucket = bucket as u8;
            let corrupt = |bit: usize, reason: String| TrieError::Corrupt {
                bucket,
                bit,
                reason,
            };

            if root.bit_len < 8 || root.bits.first() != Some(&bucket) {
                return Err(corrupt(0, "root does not span its bucket byte".to_string()));
            }
            if root.value.is_none() && root.num_children() == 1 {
                return Err(corrupt(0, "valueless root with a single child".to_string()));
            }

            let mut stack = vec![(root, 0usize, true)];
            while let Some((node, start, is_root)) = stack.pop() {
                if node.bits.len() != span_bytes(start, node.bit_len) {
                    return Err(corrupt(
                        start,
                        format!(
                            "{} bytes stored for {} bits",
                            node.bits.len(),
                            node.bit_len
                        ),
                    ));
                }
                let end = start + node.bit_len;
                let mut padded = node.bits.clone();
                if let Some(first) = padded.first_mut() {
                    *first = clear_high_bits(*first, start % 8);
                }
                if let Some(last) = padded.last_mut() {
                    if end % 8 != 0 {
                        *last = clear_low_bits(*last, 8 - end % 8);
                    }
                }
                if padded != node.bits {
                    return Err(corrupt(start, "bits set outside the segment".to_string()));
                }
                if !is_root && node.value.is_none() && node.num_children() < 2 {
                    return Err(corrupt(
                        start,
                        format!("valueless node with {} children", node.num_children()),
                    ));
                }
                if node.value.is_some() {
                    values += 1;
                }
                for (bit, child) in node.children() {
                    if child.first_bit(end) != Some(bit) {
                        return Err(corrupt(end, format!("child in slot {bit} starts wrong")));
                    }
                    stack.push((child, end, false));
                }
            }
        }

        if values != self.len {
            return Err(TrieError::Corrupt {
                bucket: 0,
                bit: 0,
                reason: format!("{values} values stored but len is {}", self.len),
            });
        }
        Ok(())
    }
}

impl<V: Debug> BitTrie<V> {
    /// Print every bucket's node structure to stderr.
    pub fn print_tree(&self) {
        if self.is_empty() {
            eprintln!("[]");
        }
        for (bucket, root) in self.roots.iter().enumerate() {
            let Some(root) = root.as_deref() else {
                continue;
            };
            eprintln!("bucket {bucket:02x}:");
            Self::print_tree_recurse(root, 0, 1);
        }
    }

    fn print_tree_recurse(node: &Node<V>, start: usize, depth: usize) {
        let indent = "  ".repeat(depth);
        match &node.value {
            Some(value) => eprintln!(
                "{}[{}] {} = {:?}",
                indent,
                node.bit_len,
                node.describe_segment(start),
                value
            ),
            None => eprintln!("{}[{}] {}", indent, node.bit_len, node.describe_segment(start)),
        }
        for (_, child) in node.children() {
            Self::print_tree_recurse(child, start + node.bit_len, depth + 1);
        }
    }

    /// JSON dump of one bucket's node structure, or `None` if the bucket is empty.
    #[cfg(feature = "dump")]
    pub fn dump_bucket(&self, first: u8) -> Option<String> {
        let root = self.roots[first as usize].as_deref()?;
        let info = crate::dump::NodeInfo::build(root, 0);
        serde_json::to_string_pretty(&info).ok()
    }
}

impl<'a, V> IntoIterator for &'a BitTrie<V> {
    type Item = (Vec<u8>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
