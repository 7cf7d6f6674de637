//! Cache Statistics Module
//!
//! Cache-wide snapshot of entry count, hits, misses and evictions.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Aggregate over all shards, recomputed by each maintenance pass.
///
/// Values are point-in-time sums and may lag the live shards by up to one
/// maintenance interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals
    pub misses: u64,
    /// Number of entries evicted by maintenance
    pub evictions: u64,
    /// Number of entries across all shards
    pub total_entries: usize,
    /// When maintenance last refreshed this snapshot, None before the first pass
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Accumulate ==
    /// Adds one shard's counters to the running totals.
    pub fn accumulate(&mut self, entries: usize, hits: u64, misses: u64, evictions: u64) {
        self.total_entries += entries;
        self.hits += hits;
        self.misses += misses;
        self.evictions += evictions;
    }
}
