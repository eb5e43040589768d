//! Background reclamation of expired file cache entries.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use super::file_cache::FileCache;

/// Periodically runs [`FileCache::sweep`] until the task is dropped.
///
/// Errors are logged and the next tick tries again.
pub async fn run_sweeper(cache: Arc<FileCache>, every: Duration) {
    let mut ticker = time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick fires immediately; skip it so startup stays quiet.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        match cache.sweep().await {
            Ok(report) if report.removed > 0 => {
                info!(
                    scanned = report.scanned,
                    removed = report.removed,
                    "File cache sweep finished"
                );
            }
            Ok(_) => {}
            Err(e) => warn!("File cache sweep failed: {}", e),
        }
    }
}
