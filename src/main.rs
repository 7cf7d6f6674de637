//! Sharded LRU - demo host process
//!
//! Starts a cache from environment configuration, runs a small synthetic
//! workload and reports statistics until shutdown.

use std::env;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sharded_lru::{shutdown_channel, Config, ShardedCache};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Start the cache and its maintenance task
/// 4. Write twice the capacity in keys, then read a sample back
/// 5. Wait one maintenance interval and print the statistics snapshot
/// 6. Wait for SIGINT/SIGTERM (skipped when `CACHE_DEMO_EXIT=1`)
/// 7. Cancel maintenance and wait for it to stop
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharded_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sharded LRU cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, shards={}, maintenance_interval={}ms",
        config.capacity,
        config.shards,
        config.maintenance_interval.as_millis()
    );

    let (trigger, token) = shutdown_channel();
    let (cache, maintenance) =
        ShardedCache::start(config, token).context("failed to start cache")?;

    run_workload(&cache);

    let settle = cache
        .maintenance_interval()
        .saturating_add(Duration::from_millis(50));
    tokio::time::sleep(settle).await;

    let stats = serde_json::to_string_pretty(&cache.stats())?;
    info!("Cache statistics:\n{}", stats);

    if env::var("CACHE_DEMO_EXIT").as_deref() != Ok("1") {
        shutdown_signal().await;
    }

    trigger.cancel();
    maintenance.await.context("maintenance task failed")?;
    warn!("Maintenance task stopped");

    info!("Shutdown complete");
    Ok(())
}

/// Fills the cache past capacity and reads back every tenth key.
fn run_workload(cache: &ShardedCache) {
    let keys = cache.capacity().saturating_mul(2);

    for i in 0..keys {
        cache.set(format!("key:{i}"), format!("value:{i}"));
    }

    let found = (0..keys)
        .step_by(10)
        .filter(|i| cache.get(&format!("key:{i}")).is_some())
        .count();

    info!(written = keys, sampled_hits = found, "Synthetic workload complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
