//! In-memory storage backend.
//!
//! Used for dry runs, where a copy of the real state is processed without
//! writing anything back, and in tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FeedCheckpoint, ProcessedIdentities, ReportLedger};
use crate::storage::StateStore;

#[derive(Debug, Default)]
struct State {
    checkpoint: FeedCheckpoint,
    identities: ProcessedIdentities,
    ledger: ReportLedger,
    checkpoint_writes: usize,
    identity_writes: usize,
}

/// State held in process memory only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current contents of another store.
    pub async fn snapshot_of(store: &dyn StateStore) -> Result<Self> {
        let state = State {
            checkpoint: store.load_checkpoint().await?,
            identities: store.load_identities().await?,
            ledger: store.load_ledger().await?,
            ..State::default()
        };
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// Number of checkpoint saves since creation.
    pub fn checkpoint_writes(&self) -> usize {
        self.lock().checkpoint_writes
    }

    /// Number of identity log saves since creation.
    pub fn identity_writes(&self) -> usize {
        self.lock().identity_writes
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // state stays consistent even if a holder panicked
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StateStore for MemoryStorage {
    async fn load_checkpoint(&self) -> Result<FeedCheckpoint> {
        Ok(self.lock().checkpoint.clone())
    }

    async fn save_checkpoint(&self, checkpoint: &FeedCheckpoint) -> Result<()> {
        let mut state = self.lock();
        state.checkpoint = checkpoint.clone();
        state.checkpoint_writes += 1;
        Ok(())
    }

    async fn load_identities(&self) -> Result<ProcessedIdentities> {
        Ok(self.lock().identities.clone())
    }

    async fn save_identities(&self, identities: &ProcessedIdentities) -> Result<()> {
        let mut state = self.lock();
        state.identities = identities.clone();
        state.identity_writes += 1;
        Ok(())
    }

    async fn load_ledger(&self) -> Result<ReportLedger> {
        Ok(self.lock().ledger.clone())
    }

    async fn save_ledger(&self, ledger: &ReportLedger) -> Result<()> {
        self.lock().ledger = ledger.clone();
        Ok(())
    }
}
