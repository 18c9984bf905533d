use crate::node::Node;
use crate::utils::bits::splice_segment;

type Bucket<V> = Option<Box<Node<V>>>;

/// Iterator over every key-value pair of a [`BitTrie`](crate::BitTrie).
///
/// Buckets are visited in first-byte order, and each bucket depth-first: a node's own value, then
/// its left (0) subtree, then its right (1) subtree. That is exactly lexicographic key order.
pub struct Iter<'a, V> {
    buckets: std::slice::Iter<'a, Bucket<V>>,
    stack: Vec<Frame<'a, V>>,
}

// A node still to visit, with the key bits leading up to it. When `start` falls inside a byte,
// the last byte of `prefix` is partial and the node's first byte gets OR-ed into it.
struct Frame<'a, V> {
    node: &'a Node<V>,
    start: usize,
    prefix: Vec<u8>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(roots: &'a [Bucket<V>]) -> Self {
        Self {
            buckets: roots.iter(),
            stack: Vec::new(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<u8>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(Frame {
                node,
                start,
                mut prefix,
            }) = self.stack.pop()
            else {
                // Current bucket exhausted, move on to the next non-empty one.
                let root = self.buckets.next()?;
                if let Some(root) = root.as_deref() {
                    self.stack.push(Frame {
                        node: root,
                        start: 0,
                        prefix: Vec::new(),
                    });
                }
                continue;
            };

            splice_segment(&mut prefix, start, &node.bits);
            let end = start + node.bit_len;

            // Right first, so left pops first.
            for child in [node.right.as_deref(), node.left.as_deref()]
                .into_iter()
                .flatten()
            {
                self.stack.push(Frame {
                    node: child,
                    start: end,
                    prefix: prefix.clone(),
                });
            }

            if let Some(value) = &node.value {
                return Some((prefix, value));
            }
        }
    }
}
