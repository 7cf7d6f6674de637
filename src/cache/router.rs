//! Router Module
//!
//! Maps keys to shard indices.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// == Router ==
/// Deterministic key-to-shard mapping.
///
/// `DefaultHasher::new()` uses fixed SipHash keys, so the same key always maps
/// to the same shard for a given shard count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    shards: usize,
}

impl Router {
    /// Creates a router over `shards` shards (at least 1).
    pub fn new(shards: usize) -> Self {
        Self {
            shards: shards.max(1),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards
    }

    // == Shard For ==
    /// Returns the shard index in `[0, shard_count)` owning `key`.
    pub fn shard_for(&self, key: &str) -> usize {
        if self.shards == 1 {
            return 0;
        }
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.shards as u64) as usize
    }
}
