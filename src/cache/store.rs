//! Cache Store Module
//!
//! Main cache engine routing each key to one of a fixed set of LRU shards.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStats, Router, Shard};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_maintenance_task, ShutdownToken};

// == Sharded Cache ==
/// Thread-safe, size-bounded cache with per-shard LRU eviction.
///
/// Operations on different shards never contend. Capacity is enforced by the
/// maintenance pass, so a shard may briefly hold more than its share between
/// passes. `len`, `hits`, `misses` and `evictions` read the snapshot taken by
/// the last pass.
#[derive(Debug)]
pub struct ShardedCache {
    shards: Box<[Shard]>,
    router: Router,
    capacity: usize,
    maintenance_interval: Duration,
    stats: RwLock<CacheStats>,
    /// Serializes maintenance passes so snapshots are published in order
    maintenance: Mutex<()>,
}

impl ShardedCache {
    // == Constructor ==
    /// Creates a cache without a maintenance task.
    ///
    /// Capacity is only enforced when [`run_maintenance`](Self::run_maintenance)
    /// is called. Use [`start`](Self::start) for the self-maintaining variant.
    pub fn new(config: Config) -> Result<Self> {
        let config = config.normalized()?;
        let shard_capacity = config.shard_capacity();

        let shards = (0..config.shards)
            .map(|_| Shard::new(shard_capacity))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        info!(
            capacity = config.capacity,
            shards = config.shards,
            shard_capacity,
            interval = ?config.maintenance_interval,
            "Sharded cache created"
        );

        Ok(Self {
            shards,
            router: Router::new(config.shards),
            capacity: config.capacity,
            maintenance_interval: config.maintenance_interval,
            stats: RwLock::new(CacheStats::new()),
            maintenance: Mutex::new(()),
        })
    }

    // == Start ==
    /// Creates a cache and spawns its maintenance task on the current tokio runtime.
    ///
    /// The task stops once `shutdown` is cancelled or the cache is dropped.
    pub fn start(
        config: Config,
        shutdown: ShutdownToken,
    ) -> Result<(Arc<Self>, JoinHandle<()>)> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CacheError::NoRuntime);
        }

        let cache = Arc::new(Self::new(config)?);
        let handle = spawn_maintenance_task(&cache, shutdown);
        Ok((cache, handle))
    }

    // == Get ==
    /// Retrieves a value by key, marking it most recently used in its shard.
    pub fn get(&self, key: &str) -> Option<String> {
        self.shard(key).get(key)
    }

    // == Set ==
    /// Stores a key-value pair, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.shard(&key).set(key, value.into());
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.shard(key).delete(key)
    }

    // == Run Maintenance ==
    /// Runs one maintenance pass: cleans every shard, then refreshes the stats
    /// snapshot. Returns the number of entries evicted.
    ///
    /// Concurrent callers run one pass at a time, so a later pass never has
    /// its snapshot replaced by an earlier one.
    pub fn run_maintenance(&self) -> usize {
        let _pass = self.maintenance.lock();
        let evicted: usize = self.shards.iter().map(Shard::cleanup).sum();

        let mut snapshot = CacheStats::new();
        for shard in self.shards.iter() {
            let (entries, hits, misses, evictions) = shard.counters();
            snapshot.accumulate(entries, hits, misses, evictions);
        }
        snapshot.refreshed_at = Some(Utc::now());

        debug!(
            evicted,
            total_entries = snapshot.total_entries,
            hits = snapshot.hits,
            misses = snapshot.misses,
            "Maintenance pass complete"
        );

        *self.stats.write() = snapshot;
        evicted
    }

    // == Stats ==
    /// Returns the snapshot taken by the last maintenance pass.
    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    /// Configured total capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry count as of the last maintenance pass.
    pub fn len(&self) -> usize {
        self.stats.read().total_entries
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hit count as of the last maintenance pass.
    pub fn hits(&self) -> u64 {
        self.stats.read().hits
    }

    /// Miss count as of the last maintenance pass.
    pub fn misses(&self) -> u64 {
        self.stats.read().misses
    }

    /// Eviction count as of the last maintenance pass.
    pub fn evictions(&self) -> u64 {
        self.stats.read().evictions
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn maintenance_interval(&self) -> Duration {
        self.maintenance_interval
    }

    #[cfg(test)]
    pub(crate) fn shards(&self) -> &[Shard] {
        &self.shards
    }

    fn shard(&self, key: &str) -> &Shard {
        &self.shards[self.router.shard_for(key)]
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn single_shard(capacity: usize) -> ShardedCache {
        ShardedCache::new(Config::new(capacity, 1, Duration::from_secs(60))).unwrap()
    }

    #[test]
    fn test_cache_new() {
        let cache = ShardedCache::new(Config::new(100, 4, Duration::from_secs(1))).unwrap();

        assert_eq!(cache.capacity(), 100);
        assert_eq!(cache.shard_count(), 4);
        assert_eq!(cache.maintenance_interval(), Duration::from_secs(1));
        assert!(cache.shards().iter().all(|shard| shard.capacity() == 25));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_shards_coerced() {
        let cache = ShardedCache::new(Config::new(10, 0, Duration::from_secs(1))).unwrap();
        assert_eq!(cache.shard_count(), 1);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = ShardedCache::new(Config::new(10, 1, Duration::ZERO));
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_uneven_capacity_discards_remainder() {
        let cache = ShardedCache::new(Config::new(10, 3, Duration::from_secs(1))).unwrap();

        assert_eq!(cache.capacity(), 10);
        assert!(cache.shards().iter().all(|shard| shard.capacity() == 3));
    }

    #[test]
    fn test_set_and_get() {
        let cache = single_shard(10);

        cache.set("key1", "value1");
        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_delete() {
        let cache = single_shard(10);

        cache.set("key1", "value1");
        assert!(cache.delete("key1"));
        assert!(!cache.delete("key1"));
        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn test_stats_are_snapshots() {
        let cache = single_shard(10);

        cache.set("key1", "value1");
        cache.get("key1");
        cache.get("missing");

        // Nothing is visible until maintenance runs
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.misses(), 0);

        cache.run_maintenance();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert!(cache.stats().refreshed_at.is_some());
    }

    #[test]
    fn test_maintenance_evicts_lru() {
        let cache = single_shard(2);

        cache.set("a", "1");
        cache.set("b", "2");
        cache.get("a");
        cache.set("c", "3");

        assert_eq!(cache.run_maintenance(), 1);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some("1".to_string()));
        assert_eq!(cache.get("c"), Some("3".to_string()));
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn test_stats_sum_over_shards() {
        let cache = ShardedCache::new(Config::new(1000, 8, Duration::from_secs(1))).unwrap();

        for i in 0..100 {
            cache.set(format!("key{i}"), "v");
        }
        for i in 0..100 {
            cache.get(&format!("key{i}"));
        }
        for i in 0..10 {
            cache.get(&format!("missing{i}"));
        }

        assert_eq!(cache.run_maintenance(), 0);

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 100);
        assert_eq!(stats.hits, 100);
        assert_eq!(stats.misses, 10);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_concurrent_maintenance_never_regresses_stats() {
        let cache = Arc::new(
            ShardedCache::new(Config::new(1000, 4, Duration::from_secs(60))).unwrap(),
        );
        cache.set("key", "value");

        let maintainers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let mut last_hits = 0;
                    for _ in 0..500 {
                        cache.get("key");
                        cache.get("missing");
                        cache.run_maintenance();
                        let stats = cache.stats();
                        assert!(stats.hits >= last_hits, "hits went backwards");
                        last_hits = stats.hits;
                    }
                })
            })
            .collect();

        for handle in maintainers {
            handle.join().unwrap();
        }

        cache.run_maintenance();
        assert_eq!(cache.hits(), 2000);
        assert_eq!(cache.misses(), 2000);
    }

    #[test]
    fn test_huge_interval_accepted() {
        let cache = ShardedCache::new(Config::new(10, 1, Duration::MAX)).unwrap();
        assert_eq!(cache.maintenance_interval(), Duration::MAX);
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let (_trigger, token) = crate::tasks::shutdown_channel();
        let result = ShardedCache::start(Config::default(), token);
        assert!(matches!(result, Err(CacheError::NoRuntime)));
    }
}
