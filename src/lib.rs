//! Sharded LRU - An in-memory key/value cache
//!
//! Splits the keyspace across independently locked shards, each evicting its
//! least recently used entries down to a local capacity. A background task
//! enforces capacity and refreshes cache-wide statistics at a fixed interval.
//!
//! # Example
//! ```no_run
//! use std::time::Duration;
//! use sharded_lru::{shutdown_channel, Config, ShardedCache};
//!
//! #[tokio::main]
//! async fn main() -> sharded_lru::error::Result<()> {
//!     let (trigger, token) = shutdown_channel();
//!     let config = Config::new(10_000, 16, Duration::from_secs(1));
//!     let (cache, maintenance) = ShardedCache::start(config, token)?;
//!
//!     cache.set("user:123", "John Doe");
//!     assert_eq!(cache.get("user:123").as_deref(), Some("John Doe"));
//!
//!     trigger.cancel();
//!     let _ = maintenance.await;
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, ShardedCache};
pub use config::Config;
pub use error::CacheError;
pub use tasks::{shutdown_channel, spawn_maintenance_task, ShutdownToken, ShutdownTrigger};
