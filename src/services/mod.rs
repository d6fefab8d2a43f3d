//! Service layer for the bulletin watcher.
//!
//! This module contains the business logic for:
//! - Feed and document retrieval (`Fetch`, `HttpFetcher`)
//! - Feed freshness checks (`FeedPoller`)
//! - Entry classification and parsing (`BulletinCollector`)

mod classifier;
mod fetcher;
mod poller;

pub use classifier::{BulletinCollector, TSUNAMI_TOKEN, classify};
pub use fetcher::{FeedResponse, Fetch, HttpFetcher};
pub use poller::{FeedPoll, FeedPoller};
