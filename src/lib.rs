//! # bitrie
//!
//! A bitwise PATRICIA trie mapping byte-string keys to arbitrary values.
//!
//! Keys are split into 256 buckets by their first byte. Within a bucket, nodes hold runs of bits
//! rather than whole bytes, so structure is shared down to the exact bit where two keys diverge.
//! Inserts split segments anywhere inside a byte, and removes merge them back together.
//!
//! ```rust
//! use bitrie::BitTrie;
//!
//! let mut trie = BitTrie::new();
//! trie.insert(b"\x00\x00", "low").unwrap();
//! trie.insert(b"\x00\x80", "high").unwrap();
//!
//! assert_eq!(trie.get(b"\x00\x80"), Some(&"high"));
//! for (key, value) in trie.iter() {
//!     println!("{:02x?} -> {}", key, value);
//! }
//! ```
//!
//! ## Features
//!
//! - `dump` (default): [`BitTrie::dump_bucket`], a JSON rendering of one bucket's nodes.

#[cfg(feature = "dump")]
mod dump;
pub mod error;
pub mod iter;
pub mod keys;
mod node;
pub mod stats;
pub mod tree;
pub mod utils;

#[cfg(test)]
mod proptests;

pub use error::{Result, TrieError};
pub use keys::{Key, SliceKey, VectorKey};
pub use stats::TrieStats;
pub use tree::BitTrie;
