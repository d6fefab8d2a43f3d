//! Out-of-band stop signal for the watch loop.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::BulletinRecord;
use crate::notify::Notifier;

/// Sentinel file name inside the storage directory.
pub const STOP_FILE_NAME: &str = "STOP";

/// Text broadcast once when the sentinel is honoured.
pub const SHUTDOWN_NOTICE: &str = "地震情報の配信を停止しました。";

/// Checked after each cycle's deliveries.
#[async_trait]
pub trait StopCondition: Send + Sync {
    /// Return `true` when the watch loop should exit.
    async fn evaluate(&self, delivered: &[BulletinRecord], notifier: &dyn Notifier)
    -> Result<bool>;
}

/// Stops when a sentinel file appears.
///
/// The file is removed once honoured so the next start runs normally.
#[derive(Debug, Clone)]
pub struct StopFile {
    path: PathBuf,
}

impl StopFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sentinel at `{storage_dir}/STOP`.
    pub fn in_dir(storage_dir: impl AsRef<Path>) -> Self {
        Self::new(storage_dir.as_ref().join(STOP_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StopCondition for StopFile {
    async fn evaluate(
        &self,
        delivered: &[BulletinRecord],
        notifier: &dyn Notifier,
    ) -> Result<bool> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }

        log::info!(
            "Stop requested via {} after {} deliveries",
            self.path.display(),
            delivered.len()
        );
        if let Err(e) = notifier.broadcast_text(SHUTDOWN_NOTICE).await {
            log::warn!("Failed to broadcast shutdown notice: {}", e);
        }

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(true)
    }
}
