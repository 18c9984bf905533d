//! Error types for bitrie

use thiserror::Error;

/// Result type alias for trie operations
pub type Result<T> = std::result::Result<T, TrieError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// Keys are bucketed by their first byte, so a zero-length key has nowhere to live.
    #[error("key must not be empty")]
    EmptyKey,

    /// A structural invariant does not hold. Only ever produced by `BitTrie::validate`.
    #[error("corrupt node in bucket {bucket:#04x} at bit {bit}: {reason}")]
    Corrupt {
        bucket: u8,
        bit: usize,
        reason: String,
    },
}
