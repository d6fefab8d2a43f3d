// src/pipeline/watch.rs

//! Fixed-interval watch loop.

use std::time::Duration;

use crate::notify::StopCondition;
use crate::pipeline::cycle::Watcher;

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchExit {
    StopRequested,
    Interrupted,
}

/// Run cycles until the stop condition fires or Ctrl-C arrives.
///
/// A failed cycle is logged and the loop carries on at the next tick.
pub async fn run_watch(
    watcher: &Watcher<'_>,
    stop: &dyn StopCondition,
    interval: Duration,
) -> WatchExit {
    log::info!("Watching every {}s", interval.as_secs());

    loop {
        let delivered = match watcher.run_cycle().await {
            Ok(report) => report.delivered,
            Err(e) => {
                log::error!("Cycle aborted: {}", e);
                Vec::new()
            }
        };

        match stop.evaluate(&delivered, watcher.notifier()).await {
            Ok(true) => return WatchExit::StopRequested,
            Ok(false) => {}
            Err(e) => log::warn!("Stop check failed: {}", e),
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted");
                return WatchExit::Interrupted;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, Result};
    use crate::models::BulletinRecord;
    use crate::notify::Notifier;
    use crate::services::{FeedResponse, Fetch};
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DownFeed;

    #[async_trait]
    impl Fetch for DownFeed {
        async fn fetch_feed(&self, url: &str) -> Result<FeedResponse> {
            Err(AppError::validation(format!("{url} unreachable")))
        }

        async fn fetch_document(&self, url: &str) -> Result<String> {
            Err(AppError::validation(format!("{url} unreachable")))
        }
    }

    struct Silent;

    #[async_trait]
    impl Notifier for Silent {
        async fn broadcast(&self, _: &BulletinRecord) -> Result<()> {
            Ok(())
        }

        async fn broadcast_text(&self, _: &str) -> Result<()> {
            Ok(())
        }
    }

    /// Stops on the given evaluation, counting calls.
    struct StopAfter {
        calls: AtomicUsize,
        limit: usize,
    }

    #[async_trait]
    impl StopCondition for StopAfter {
        async fn evaluate(&self, _: &[BulletinRecord], _: &dyn Notifier) -> Result<bool> {
            Ok(self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= self.limit)
        }
    }

    #[tokio::test]
    async fn test_loop_survives_unreachable_feed_until_stopped() {
        let store = MemoryStorage::new();
        let watcher = Watcher::new("https://example.jma/feed.xml", &DownFeed, &store, &Silent);
        let stop = StopAfter {
            calls: AtomicUsize::new(0),
            limit: 3,
        };

        let exit = run_watch(&watcher, &stop, Duration::from_millis(1)).await;
        assert_eq!(exit, WatchExit::StopRequested);
        assert_eq!(stop.calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.checkpoint_writes(), 0);
    }
}
