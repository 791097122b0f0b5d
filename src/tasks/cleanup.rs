//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired entries out of every
//! cache tier.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheTiers;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// Each run takes the write lock of one tier at a time, so feature calls
/// against the other tiers are never blocked by a sweep.
///
/// # Arguments
/// * `tiers` - The short, medium and long stores to sweep
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(tiers: CacheTiers, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = tiers.cleanup_all().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
