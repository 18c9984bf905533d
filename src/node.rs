use std::fmt::Write;

use tracing::trace;

use crate::utils::bits::{
    bit_at, clear_high_bits, clear_low_bits, key_bit, matching_bit_run, span_bytes,
    splice_segment,
};

/// A node covers a run of `bit_len` key bits, its segment.
///
/// The node does not know where its segment starts; every method that needs it takes the absolute
/// bit offset `start` from the caller. `bits` is packed against the key's byte grid, so byte 0 of
/// `bits` lines up with key byte `start / 8`, and bits outside `[start, start + bit_len)` are zero.
///
/// Children are selected by the first bit of their own segment: `left` starts with a 0, `right`
/// with a 1.
pub(crate) struct Node<V> {
    pub(crate) bit_len: usize,
    pub(crate) bits: Vec<u8>,
    pub(crate) left: Option<Box<Node<V>>>,
    pub(crate) right: Option<Box<Node<V>>>,
    pub(crate) value: Option<V>,
}

/// Outcome of offering a key to a node during insertion.
pub(crate) enum PathSplit<V> {
    /// The whole segment matched and the child at bit `next` has to take the key.
    Descend { next: usize, value: V },
    /// The key was placed; carries the value it replaced, if any.
    Inserted(Option<V>),
}

impl<V> Node<V> {
    /// A leaf holding every key bit from `start` to the end of `key`.
    pub(crate) fn new_leaf(key: &[u8], start: usize, value: V) -> Self {
        let mut bits = key[start / 8..].to_vec();
        if let Some(first) = bits.first_mut() {
            *first = clear_high_bits(*first, start % 8);
        }
        Self {
            bit_len: key.len() * 8 - start,
            bits,
            left: None,
            right: None,
            value: Some(value),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn num_children(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }

    pub(crate) fn child(&self, bit: u8) -> Option<&Node<V>> {
        match bit {
            0 => self.left.as_deref(),
            _ => self.right.as_deref(),
        }
    }

    pub(crate) fn child_mut(&mut self, bit: u8) -> Option<&mut Node<V>> {
        self.slot_mut(bit).as_deref_mut()
    }

    /// Children in key order: left, then right.
    pub(crate) fn children(&self) -> impl Iterator<Item = (u8, &Node<V>)> {
        let left = self.left.as_deref().map(|n| (0, n));
        let right = self.right.as_deref().map(|n| (1, n));
        left.into_iter().chain(right)
    }

    pub(crate) fn take_child(&mut self, bit: u8) -> Option<Box<Node<V>>> {
        self.slot_mut(bit).take()
    }

    fn slot_mut(&mut self, bit: u8) -> &mut Option<Box<Node<V>>> {
        match bit {
            0 => &mut self.left,
            _ => &mut self.right,
        }
    }

    fn set_child(&mut self, bit: u8, node: Node<V>) {
        let slot = self.slot_mut(bit);
        debug_assert!(slot.is_none(), "two children claim next bit {bit}");
        *slot = Some(Box::new(node));
    }

    /// A valueless node with a single child exists only transiently, between a delete and the
    /// merge that follows it.
    pub(crate) fn is_mergeable(&self) -> bool {
        self.value.is_none() && self.num_children() == 1
    }

    /// First bit of this node's segment when it starts at `start`.
    pub(crate) fn first_bit(&self, start: usize) -> Option<u8> {
        if self.bit_len == 0 {
            return None;
        }
        self.bits.first().map(|b| bit_at(*b, start % 8))
    }

    /// Number of leading segment bits equal to the key bits from `start` on. Stops early at the
    /// end of the key.
    fn matching_bits(&self, key: &[u8], start: usize) -> usize {
        if self.bit_len == 0 {
            return 0;
        }
        let seg_end = start + self.bit_len;
        let first_byte = start / 8;
        let mut matched = 0;
        for (i, &seg) in self.bits.iter().enumerate() {
            let Some(&data) = key.get(first_byte + i) else {
                break;
            };
            let lo = (first_byte + i) * 8;
            let begin = start.saturating_sub(lo);
            let end = (seg_end - lo).min(8);
            let run = if begin == 0 && end == 8 && seg == data {
                8
            } else {
                matching_bit_run(seg, data, begin, end)
            };
            matched += run;
            if run < end - begin {
                break;
            }
        }
        matched
    }

    /// Checks the whole segment against `key` at bit `start`. On a match returns the offset just
    /// past the segment.
    pub(crate) fn path_compare(&self, key: &[u8], start: usize) -> Option<usize> {
        let end = start + self.bit_len;
        if end > key.len() * 8 {
            return None;
        }

        let first_byte = start / 8;
        for (i, &seg) in self.bits.iter().enumerate() {
            let b = first_byte + i;
            let mut data = *key.get(b)?;
            if i == 0 {
                data = clear_high_bits(data, start % 8);
            }
            if (b + 1) * 8 > end {
                data = clear_low_bits(data, (b + 1) * 8 - end);
            }
            if data != seg {
                return None;
            }
        }
        Some(end)
    }

    /// Inserts `value` for `key`, whose bits before `start` already matched the path down to
    /// this node.
    ///
    /// Either the key fits here (possibly by splitting this segment), or the segment is a prefix
    /// of the key and the child picked by the next key bit must continue.
    pub(crate) fn path_split(&mut self, key: &[u8], start: usize, value: V) -> PathSplit<V> {
        let key_end = key.len() * 8;
        let seg_end = start + self.bit_len;
        let split = start + self.matching_bits(key, start);
        let rest_key = key_end - split;

        if split == seg_end {
            if rest_key == 0 {
                return PathSplit::Inserted(self.value.replace(value));
            }
            let bit = key_bit(key, split);
            if self.child(bit).is_some() {
                return PathSplit::Descend { next: split, value };
            }
            trace!(at = split, bits = rest_key, "appending leaf");
            self.set_child(bit, Node::new_leaf(key, split, value));
            return PathSplit::Inserted(None);
        }

        trace!(start, at = split, bit_len = self.bit_len, "splitting segment");
        let tail = self.split_at(start, split);
        let tail_bit = bit_at(tail.bits[0], split % 8);
        self.set_child(tail_bit, tail);

        if rest_key == 0 {
            self.value = Some(value);
        } else {
            let bit = key_bit(key, split);
            debug_assert_ne!(bit, tail_bit);
            self.set_child(bit, Node::new_leaf(key, split, value));
        }
        PathSplit::Inserted(None)
    }

    /// Cuts this segment at absolute bit `split`. `self` keeps `[start, split)` and loses its
    /// children and value to the returned node, which holds the rest of the segment.
    fn split_at(&mut self, start: usize, split: usize) -> Node<V> {
        debug_assert!(split >= start && split < start + self.bit_len);
        let offset = split % 8;
        let mut tail_bits = self.bits.split_off(split / 8 - start / 8);
        if offset != 0 {
            // The byte holding the split point is shared: matched bits stay, the rest move down.
            let shared = tail_bits[0];
            tail_bits[0] = clear_high_bits(shared, offset);
            self.bits.push(clear_low_bits(shared, 8 - offset));
        }

        let tail = Node {
            bit_len: start + self.bit_len - split,
            bits: tail_bits,
            left: self.left.take(),
            right: self.right.take(),
            value: self.value.take(),
        };
        self.bit_len = split - start;
        tail
    }

    /// Folds a valueless node with exactly one child into that child. Returns whether anything
    /// changed.
    pub(crate) fn path_merge(&mut self, start: usize) -> bool {
        if !self.is_mergeable() {
            return false;
        }
        let Some(child) = self.left.take().or_else(|| self.right.take()) else {
            return false;
        };

        let end = start + self.bit_len;
        trace!(start, at = end, child_bits = child.bit_len, "merging segment");
        let Node {
            bit_len,
            bits,
            left,
            right,
            value,
        } = *child;
        splice_segment(&mut self.bits, end, &bits);
        self.bit_len += bit_len;
        self.left = left;
        self.right = right;
        self.value = value;
        debug_assert_eq!(self.bits.len(), span_bytes(start, self.bit_len));
        true
    }

    /// Human readable form of the segment: whole bytes escaped, partial bytes as
    /// `(bbbbbbbb:n)`.
    pub(crate) fn describe_segment(&self, start: usize) -> String {
        let end = start + self.bit_len;
        let mut out = String::new();
        for (i, &byte) in self.bits.iter().enumerate() {
            let lo = (start / 8 + i) * 8;
            let whole = lo >= start && lo + 8 <= end;
            if whole {
                out.extend(std::ascii::escape_default(byte).map(char::from));
            } else {
                let _ = write!(out, "({byte:08b}:{byte})");
            }
        }
        out
    }
}
