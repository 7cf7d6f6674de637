//! Maintenance Task
//!
//! Background task that periodically enforces shard capacity and refreshes
//! the cache-wide statistics snapshot.

use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::cache::ShardedCache;
use crate::tasks::ShutdownToken;

/// Spawns the maintenance loop for `cache` on the current tokio runtime.
///
/// The first pass runs one full interval after spawning, and each following
/// pass one interval after the previous one finished. Each pass runs
/// [`ShardedCache::run_maintenance`]. An interval too long to schedule from
/// now never fires; the task then only waits for shutdown. The loop exits
/// when `shutdown` is cancelled or when the cache has been dropped; a pass
/// already in progress finishes first. After exit the stats snapshot stays frozen while the cache
/// itself remains usable.
///
/// # Panics
/// Panics if called outside a tokio runtime. [`ShardedCache::start`] checks
/// for a runtime and returns an error instead.
///
/// # Example
/// ```ignore
/// let (trigger, token) = shutdown_channel();
/// let cache = Arc::new(ShardedCache::new(Config::default())?);
/// let handle = spawn_maintenance_task(&cache, token);
/// // Later, during shutdown:
/// trigger.cancel();
/// handle.await?;
/// ```
pub fn spawn_maintenance_task(
    cache: &Arc<ShardedCache>,
    mut shutdown: ShutdownToken,
) -> JoinHandle<()> {
    let period = cache.maintenance_interval();
    let cache: Weak<ShardedCache> = Arc::downgrade(cache);

    tokio::spawn(async move {
        info!(interval = ?period, "Starting cache maintenance task");

        loop {
            let deadline = Instant::now().checked_add(period);

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!("Maintenance task cancelled");
                    break;
                }
                _ = next_tick(deadline) => {}
            }

            let Some(cache) = cache.upgrade() else {
                debug!("Cache dropped, stopping maintenance task");
                break;
            };

            let evicted = cache.run_maintenance();
            if evicted > 0 {
                info!(evicted, "Maintenance: evicted least recently used entries");
            }
        }
    })
}

async fn next_tick(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::Config;
    use crate::tasks::shutdown_channel;

    fn test_cache(capacity: usize, interval_ms: u64) -> Arc<ShardedCache> {
        Arc::new(
            ShardedCache::new(Config::new(capacity, 1, Duration::from_millis(interval_ms)))
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_maintenance_evicts_overflow() {
        let cache = test_cache(2, 10);
        let (trigger, token) = shutdown_channel();

        cache.set("x", "1");
        cache.set("y", "2");
        cache.set("z", "3");

        let handle = spawn_maintenance_task(&cache, token);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get("x"), None);
        assert_eq!(cache.get("y"), Some("2".to_string()));
        assert_eq!(cache.get("z"), Some("3".to_string()));
        assert_eq!(cache.evictions(), 1);

        trigger.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_maintenance_refreshes_stats() {
        let cache = test_cache(100, 10);
        let (trigger, token) = shutdown_channel();

        cache.set("a", "1");
        cache.get("a");
        cache.get("b");

        let handle = spawn_maintenance_task(&cache, token);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);

        trigger.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_first_pass_waits_one_interval() {
        let cache = test_cache(0, 10_000);
        let (trigger, token) = shutdown_channel();

        cache.set("a", "1");
        let handle = spawn_maintenance_task(&cache, token);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(cache.get("a"), Some("1".to_string()));
        assert!(cache.stats().refreshed_at.is_none());

        trigger.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_stops_task_and_freezes_stats() {
        let cache = test_cache(1, 10);
        let (trigger, token) = shutdown_channel();

        let handle = spawn_maintenance_task(&cache, token);
        trigger.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop after cancel")
            .unwrap();

        cache.set("a", "1");
        cache.set("b", "2");
        tokio::time::sleep(Duration::from_millis(50)).await;

        // No pass ran: nothing evicted, snapshot untouched
        assert_eq!(cache.get("a"), Some("1".to_string()));
        assert_eq!(cache.get("b"), Some("2".to_string()));
        assert_eq!(cache.len(), 0);
        assert!(cache.stats().refreshed_at.is_none());
    }

    #[tokio::test]
    async fn test_dropping_cache_stops_task() {
        let cache = test_cache(10, 10);
        let (_trigger, token) = shutdown_channel();

        let handle = spawn_maintenance_task(&cache, token);
        drop(cache);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop once the cache is gone")
            .unwrap();
    }

    #[tokio::test]
    async fn test_unschedulable_interval_waits_for_shutdown() {
        let cache = Arc::new(ShardedCache::new(Config::new(10, 1, Duration::MAX)).unwrap());
        let (trigger, token) = shutdown_channel();

        cache.set("a", "1");
        let handle = spawn_maintenance_task(&cache, token);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!handle.is_finished(), "task should still be waiting");
        assert_eq!(cache.get("a"), Some("1".to_string()));

        trigger.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should stop after cancel")
            .expect("task should not panic");
    }

    #[tokio::test]
    async fn test_task_can_be_aborted() {
        let cache = test_cache(10, 1000);
        let (_trigger, token) = shutdown_channel();

        let handle = spawn_maintenance_task(&cache, token);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
