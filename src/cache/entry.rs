//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

// == Cache Entry ==
/// A stored value and the position of its key in the shard's recency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The stored value
    pub value: String,
    /// Slot index in the owning shard's [`LruList`](super::LruList)
    pub node: usize,
}

impl Entry {
    pub fn new(value: String, node: usize) -> Self {
        Self { value, node }
    }
}
