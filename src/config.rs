//! Configuration Module
//!
//! Handles loading and normalizing cache configuration.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::{CacheError, Result};

/// Default total capacity in entries
pub const DEFAULT_CAPACITY: usize = 100_000;
/// Default number of shards
pub const DEFAULT_SHARDS: usize = 16;
/// Default maintenance interval in milliseconds
pub const DEFAULT_MAINTENANCE_INTERVAL_MS: u64 = 10_000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Total number of entries, split evenly across shards
    pub capacity: usize,
    /// Number of independent shards (values below 1 are coerced to 1)
    pub shards: usize,
    /// Interval between maintenance passes
    pub maintenance_interval: Duration,
}

impl Config {
    /// Creates a new Config from explicit values.
    pub fn new(capacity: usize, shards: usize, maintenance_interval: Duration) -> Self {
        Self {
            capacity,
            shards,
            maintenance_interval,
        }
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Total cache entries (default: 100000)
    /// - `CACHE_SHARDS` - Number of shards (default: 16)
    /// - `CACHE_MAINTENANCE_INTERVAL_MS` - Maintenance frequency in milliseconds (default: 10000)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            shards: env::var("CACHE_SHARDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SHARDS),
            maintenance_interval: Duration::from_millis(
                env::var("CACHE_MAINTENANCE_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAINTENANCE_INTERVAL_MS),
            ),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    pub fn with_maintenance_interval(mut self, interval: Duration) -> Self {
        self.maintenance_interval = interval;
        self
    }

    // == Validate ==
    /// Rejects settings that cannot be coerced into something usable.
    ///
    /// A zero interval cannot drive a periodic timer.
    pub fn validate(&self) -> Result<()> {
        if self.maintenance_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "maintenance interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    // == Normalized ==
    /// Validates the config and coerces the shard count to at least 1.
    pub fn normalized(mut self) -> Result<Self> {
        self.validate()?;
        if self.shards < 1 {
            warn!(requested = self.shards, "Shard count below 1, using a single shard");
            self.shards = 1;
        }
        Ok(self)
    }

    /// Capacity assigned to each shard.
    ///
    /// Floor division: when `shards` does not divide `capacity`, the remainder
    /// is not allocated to any shard.
    pub fn shard_capacity(&self) -> usize {
        self.capacity / self.shards.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            shards: DEFAULT_SHARDS,
            maintenance_interval: Duration::from_millis(DEFAULT_MAINTENANCE_INTERVAL_MS),
        }
    }
}
