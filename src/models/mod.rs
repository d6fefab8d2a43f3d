// src/models/mod.rs

//! Domain models for the bulletin watcher.
//!
//! This module contains the data structures shared by the parsers,
//! the sequencing engine and the persisted state.

mod bulletin;
mod config;
mod intensity;
mod state;

// Re-export all public types
pub use bulletin::{AreaMap, BulletinEntry, BulletinKind, BulletinRecord, Identity};
pub use config::{Config, FeedConfig, NotifierConfig, POLL_INTERVAL};
pub use intensity::SeismicIntensity;
pub use state::{FeedCheckpoint, ProcessedIdentities, ReportLedger};
