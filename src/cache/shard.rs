//! Shard Module
//!
//! A lock-protected LRU store owning one partition of the keyspace.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::cache::{Entry, LruList};

// == Shard State ==
/// Everything guarded by the shard lock.
///
/// `entries` and `order` always hold the same keyset.
#[derive(Debug, Default)]
struct ShardState {
    entries: HashMap<String, Entry>,
    order: LruList,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl ShardState {
    fn evict_oldest(&mut self) -> Option<String> {
        let key = self.order.pop_back()?;
        self.entries.remove(&key);
        self.evictions += 1;
        Some(key)
    }
}

// == Shard ==
/// An independent LRU store with its own lock and local capacity.
///
/// `get` reorders recency, so it takes the exclusive lock just like the
/// mutating operations. Capacity is only enforced by [`cleanup`](Self::cleanup);
/// `set` may leave the shard above capacity until the next maintenance pass.
#[derive(Debug)]
pub struct Shard {
    state: RwLock<ShardState>,
    capacity: usize,
}

impl Shard {
    // == Constructor ==
    /// Creates an empty shard holding at most `capacity` entries after cleanup.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RwLock::new(ShardState::default()),
            capacity,
        }
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// A miss bumps the miss counter and leaves recency untouched.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut state = self.state.write();
        let state = &mut *state;

        match state.entries.get(key) {
            Some(entry) => {
                state.order.move_to_front(entry.node);
                state.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` at the most recently used position.
    ///
    /// An existing key has its value replaced and is promoted as well.
    pub fn set(&self, key: String, value: String) {
        let mut state = self.state.write();
        let state = &mut *state;

        if let Some(entry) = state.entries.get_mut(&key) {
            entry.value = value;
            state.order.move_to_front(entry.node);
            return;
        }

        let node = state.order.push_front(key.clone());
        state.entries.insert(key, Entry::new(value, node));
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let mut state = self.state.write();

        match state.entries.remove(key) {
            Some(entry) => {
                state.order.remove(entry.node);
                true
            }
            None => false,
        }
    }

    // == Cleanup ==
    /// Evicts least recently used entries until the shard is within capacity.
    ///
    /// Returns the number of evicted entries.
    pub fn cleanup(&self) -> usize {
        let mut state = self.state.write();

        let mut evicted = 0;
        while state.entries.len() > self.capacity {
            if state.evict_oldest().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.state.read().hits
    }

    pub fn misses(&self) -> u64 {
        self.state.read().misses
    }

    pub fn evictions(&self) -> u64 {
        self.state.read().evictions
    }

    /// Reads length and counters under a single lock acquisition.
    pub(crate) fn counters(&self) -> (usize, u64, u64, u64) {
        let state = self.state.read();
        (state.entries.len(), state.hits, state.misses, state.evictions)
    }

    /// Checks that the map and the recency list describe the same keyset.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let state = self.state.read();

        if state.entries.len() != state.order.len() {
            return false;
        }
        state.entries.iter().all(|(key, entry)| {
            state.order.key(entry.node) == Some(key.as_str())
        })
    }

    /// Keys from most to least recently used.
    #[cfg(test)]
    pub(crate) fn keys_by_recency(&self) -> Vec<String> {
        self.state.read().order.iter().map(str::to_string).collect()
    }
}
