//! Statistics and introspection for bitrie.
//!
//! Useful for understanding how keys share bit prefixes, and for checking that deletes fold
//! branches back together.

use crate::node::Node;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrieStats {
    /// Non-empty first-byte slots, including ones whose root was emptied by deletes.
    pub num_buckets: usize,
    pub num_nodes: usize,
    pub num_values: usize,
    /// Nodes without children.
    pub num_leaves: usize,
    pub num_inner_nodes: usize,
    /// Nodes with exactly one child. These always hold a value.
    pub num_unary_nodes: usize,
    /// Longest bucket-root-to-node chain, in nodes.
    pub max_height: usize,
    pub total_segment_bits: usize,
}

pub(crate) fn update_trie_stats<V>(stats: &mut TrieStats, node: &Node<V>, height: usize) {
    stats.num_nodes += 1;
    stats.total_segment_bits += node.bit_len;
    stats.max_height = stats.max_height.max(height);
    if node.value.is_some() {
        stats.num_values += 1;
    }
    match node.num_children() {
        0 => stats.num_leaves += 1,
        1 => {
            stats.num_inner_nodes += 1;
            stats.num_unary_nodes += 1;
        }
        _ => stats.num_inner_nodes += 1,
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::BitTrie;

    #[test]
    fn test_stats_track_structure() {
        let mut trie = BitTrie::new();
        assert_eq!(trie.get_trie_stats(), Default::default());

        trie.insert("ab", 1).unwrap();
        trie.insert("abc", 2).unwrap();
        trie.insert("abd", 3).unwrap();
        trie.insert("b", 4).unwrap();

        let stats = trie.get_trie_stats();
        assert_eq!(stats.num_buckets, 2);
        assert_eq!(stats.num_values, 4);
        // "ab" -> branch on the bits shared by 'c' and 'd' -> two leaves; "b" alone.
        assert_eq!(stats.num_nodes, 5);
        assert_eq!(stats.num_leaves, 3);
        assert_eq!(stats.num_inner_nodes, 2);
        assert_eq!(stats.num_unary_nodes, 1);
        assert_eq!(stats.max_height, 3);
        // 16 for "ab", 5 shared bits of 'c'/'d', 3 + 3 for the leaves, 8 for "b".
        assert_eq!(stats.total_segment_bits, 35);
    }
}
