//! Feed freshness check.

use crate::error::Result;
use crate::models::FeedCheckpoint;
use crate::services::{Fetch, FeedResponse};
use crate::storage::StateStore;

/// Outcome of one freshness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPoll {
    /// The feed changed since the last check; its body is ready to classify
    Updated(FeedResponse),
    /// Same `Last-Modified` as last time
    Unchanged,
    /// The feed could not be fetched; nothing was written
    Unreachable,
}

impl FeedPoll {
    /// Whether there is anything to process this cycle.
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Checks the feed against the persisted checkpoint.
pub struct FeedPoller<'a> {
    fetcher: &'a dyn Fetch,
    store: &'a dyn StateStore,
    feed_url: &'a str,
}

impl<'a> FeedPoller<'a> {
    pub fn new(fetcher: &'a dyn Fetch, store: &'a dyn StateStore, feed_url: &'a str) -> Self {
        Self {
            fetcher,
            store,
            feed_url,
        }
    }

    /// Fetch the feed and compare its `Last-Modified` with the checkpoint.
    ///
    /// The checkpoint is rewritten only when the value changed. A feed
    /// served without `Last-Modified` is always treated as updated and
    /// leaves the checkpoint alone; deduplication keeps that harmless.
    pub async fn check_for_update(&self) -> Result<FeedPoll> {
        let response = match self.fetcher.fetch_feed(self.feed_url).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Feed unreachable ({}): {}", self.feed_url, e);
                return Ok(FeedPoll::Unreachable);
            }
        };

        let Some(last_modified) = response.last_modified.as_deref() else {
            log::warn!("Feed has no Last-Modified header; processing it anyway");
            return Ok(FeedPoll::Updated(response));
        };

        let checkpoint = self.store.load_checkpoint().await?;
        if !checkpoint.is_stale(last_modified) {
            log::debug!("Feed unchanged since {}", last_modified);
            return Ok(FeedPoll::Unchanged);
        }

        log::info!("Feed updated: {}", last_modified);
        self.store
            .save_checkpoint(&FeedCheckpoint {
                latest: Some(last_modified.to_string()),
            })
            .await?;

        Ok(FeedPoll::Updated(response))
    }
}
