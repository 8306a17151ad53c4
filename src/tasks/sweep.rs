//! Expiry Sweep Task
//!
//! Background task that periodically evicts expired links.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::links::SharedEngine;

/// Spawns a background task that periodically sweeps expired links.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep holds the engine's write lock, so it never
/// interleaves with a resolution.
///
/// # Arguments
/// * `engine` - Shared link engine
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let engine = LinkEngine::new(store, policy, "www.example.com").into_shared();
/// let sweep_handle = spawn_sweep_task(engine.clone(), 60);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(engine: SharedEngine, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let report = {
                let mut engine_guard = engine.write().await;
                engine_guard.housekeeping()
            };

            if report.removed > 0 || report.failed > 0 {
                info!(
                    "Expiry sweep: removed {} expired links, {} failed",
                    report.removed, report.failed
                );
            } else {
                debug!("Expiry sweep: no expired links among {}", report.scanned);
            }
        }
    })
}
