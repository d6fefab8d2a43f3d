//! Storage abstractions for watcher state.
//!
//! Three logical stores, each read wholesale, mutated in memory and
//! rewritten wholesale:
//!
//! ```text
//! storage/
//! ├── config.toml                       # Watcher configuration
//! └── saves/
//!     ├── last_acquisition.json         # Feed checkpoint {"latest": ...}
//!     ├── latest_earthquake_info.json   # Processed identities
//!     └── report_ledger.json            # Body text -> report count
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FeedCheckpoint, ProcessedIdentities, ReportLedger};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Trait for watcher state backends.
///
/// Missing state reads as the empty value. A single process owns the state;
/// no locking across processes is attempted.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load_checkpoint(&self) -> Result<FeedCheckpoint>;

    async fn save_checkpoint(&self, checkpoint: &FeedCheckpoint) -> Result<()>;

    async fn load_identities(&self) -> Result<ProcessedIdentities>;

    async fn save_identities(&self, identities: &ProcessedIdentities) -> Result<()>;

    async fn load_ledger(&self) -> Result<ReportLedger>;

    async fn save_ledger(&self, ledger: &ReportLedger) -> Result<()>;
}
