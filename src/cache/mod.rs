//! Cache Module
//!
//! Provides a sharded in-memory cache with per-shard LRU eviction.

mod entry;
mod lru;
mod router;
mod shard;
mod stats;
mod store;


// Re-export public types
pub use entry::Entry;
pub use lru::LruList;
pub use router::Router;
pub use shard::Shard;
pub use stats::CacheStats;
pub use store::ShardedCache;
