//! Key types accepted by [`BitTrie`](crate::BitTrie).
//!
//! The trie works on raw bytes, so anything that can hand out a byte slice can be used as a key.
//! Keys are compared bit by bit, most significant bit first, which means byte order is key order.

use num_traits::{ToBytes, Unsigned};

pub trait Key {
    fn as_slice(&self) -> &[u8];

    fn length(&self) -> usize {
        self.as_slice().len()
    }

    fn at(&self, pos: usize) -> u8 {
        self.as_slice()[pos]
    }
}

// Non-owning byte slice key.
#[derive(Clone, Copy, Debug)]
pub struct SliceKey<'a> {
    data: &'a [u8],
}

impl<'a> SliceKey<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl Key for SliceKey<'_> {
    fn as_slice(&self) -> &[u8] {
        self.data
    }
}

// Owns variable sized key data. Strings are stored as-is: prefixes of other keys are legal keys,
// so no terminator is needed.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct VectorKey {
    data: Vec<u8>,
}

impl VectorKey {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: Vec::from(data),
        }
    }

    /// Big-endian encoding, so numeric order and key order agree.
    pub fn from_unsigned<T: Unsigned + ToBytes>(un: T) -> Self {
        Self::from_slice(un.to_be_bytes().as_ref())
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl Key for VectorKey {
    fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

macro_rules! unsigned_key {
    ($($t:ty),*) => {
        $(
            impl From<$t> for VectorKey {
                fn from(data: $t) -> Self {
                    Self::from_unsigned(data)
                }
            }
        )*
    };
}

unsigned_key!(u8, u16, u32, u64, u128, usize);

// Flipping the sign bit maps i::MIN..=i::MAX onto 0..=u::MAX in order.
macro_rules! signed_key {
    ($($t:ty => $u:ty),*) => {
        $(
            impl From<$t> for VectorKey {
                fn from(val: $t) -> Self {
                    let flipped = (val as $u) ^ (1 << (<$u>::BITS - 1));
                    Self::from_unsigned(flipped)
                }
            }
        )*
    };
}

signed_key!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128, isize => usize);

impl From<Vec<u8>> for VectorKey {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<&str> for VectorKey {
    fn from(data: &str) -> Self {
        Self::from_str(data)
    }
}

impl From<String> for VectorKey {
    fn from(data: String) -> Self {
        Self::from(data.into_bytes())
    }
}

impl From<&[u8]> for VectorKey {
    fn from(data: &[u8]) -> Self {
        Self::from_slice(data)
    }
}

impl Key for str {
    fn as_slice(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Key for String {
    fn as_slice(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Key for [u8] {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> Key for [u8; N] {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl Key for Vec<u8> {
    fn as_slice(&self) -> &[u8] {
        self
    }
}
