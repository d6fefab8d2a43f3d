// src/pipeline/cycle.rs

//! One poll cycle: freshness check, collection, finalization, delivery.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::BulletinRecord;
use crate::notify::{self, Notifier};
use crate::pipeline::sequence::finalize;
use crate::services::{BulletinCollector, FeedPoll, FeedPoller, Fetch};
use crate::storage::StateStore;

/// How the freshness check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Updated,
    Unchanged,
    Unreachable,
}

/// Statistics for a completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub poll: PollOutcome,
    /// Records produced by the parsers, before deduplication
    pub candidates: usize,
    /// Candidates already processed in an earlier cycle
    pub skipped: usize,
    /// Records handed to the notifier, oldest first
    pub delivered: Vec<BulletinRecord>,
    pub delivery_failures: usize,
}

impl CycleReport {
    fn idle(started_at: DateTime<Utc>, poll: PollOutcome) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            poll,
            candidates: 0,
            skipped: 0,
            delivered: Vec::new(),
            delivery_failures: 0,
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Wires the feed, state and notifier collaborators together.
pub struct Watcher<'a> {
    feed_url: String,
    fetcher: &'a dyn Fetch,
    store: &'a dyn StateStore,
    notifier: &'a dyn Notifier,
}

impl<'a> Watcher<'a> {
    pub fn new(
        feed_url: impl Into<String>,
        fetcher: &'a dyn Fetch,
        store: &'a dyn StateStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            feed_url: feed_url.into(),
            fetcher,
            store,
            notifier,
        }
    }

    pub fn notifier(&self) -> &'a dyn Notifier {
        self.notifier
    }

    /// Run one cycle to completion.
    ///
    /// A detail document failure aborts the cycle after the checkpoint has
    /// advanced; identities and the ledger are only written once every
    /// matched entry has been parsed.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let started_at = Utc::now();

        let poller = FeedPoller::new(self.fetcher, self.store, &self.feed_url);
        let response = match poller.check_for_update().await? {
            FeedPoll::Updated(response) => response,
            FeedPoll::Unchanged => {
                log::debug!("Feed unchanged");
                return Ok(CycleReport::idle(started_at, PollOutcome::Unchanged));
            }
            FeedPoll::Unreachable => {
                return Ok(CycleReport::idle(started_at, PollOutcome::Unreachable));
            }
        };

        let collector = BulletinCollector::new(self.fetcher);
        let candidates = collector.collect(&response.body, &self.feed_url).await?;
        let candidate_count = candidates.len();

        let processed = self.store.load_identities().await?;
        let mut ledger = self.store.load_ledger().await?;
        let finalized = finalize(candidates, &processed, &mut ledger);

        self.store.save_identities(&finalized.identities).await?;
        self.store.save_ledger(&ledger).await?;

        let delivery_failures = notify::deliver_all(self.notifier, &finalized.emitted).await;

        let report = CycleReport {
            started_at,
            finished_at: Utc::now(),
            poll: PollOutcome::Updated,
            candidates: candidate_count,
            skipped: finalized.skipped,
            delivered: finalized.emitted,
            delivery_failures,
        };

        log::info!(
            "Cycle done: {} candidates, {} new, {} skipped, {} failed deliveries ({}ms)",
            report.candidates,
            report.delivered.len(),
            report.skipped,
            report.delivery_failures,
            report.elapsed_ms()
        );

        Ok(report)
    }
}
