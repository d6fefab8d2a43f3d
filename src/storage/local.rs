//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── saves/
//!     ├── last_acquisition.json
//!     ├── latest_earthquake_info.json
//!     └── report_ledger.json
//! ```
//!
//! Writes go to a temporary file that is then renamed over the target.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{FeedCheckpoint, ProcessedIdentities, ReportLedger};
use crate::storage::StateStore;

const CHECKPOINT_KEY: &str = "saves/last_acquisition.json";
const IDENTITIES_KEY: &str = "saves/latest_earthquake_info.json";
const LEDGER_KEY: &str = "saves/report_ledger.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data, falling back to the type's empty value.
    async fn read_json_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => {
                log::debug!("No {} yet, starting empty", key);
                Ok(T::default())
            }
        }
    }
}

#[async_trait]
impl StateStore for LocalStorage {
    async fn load_checkpoint(&self) -> Result<FeedCheckpoint> {
        self.read_json_or_default(CHECKPOINT_KEY).await
    }

    async fn save_checkpoint(&self, checkpoint: &FeedCheckpoint) -> Result<()> {
        self.write_json(CHECKPOINT_KEY, checkpoint).await
    }

    async fn load_identities(&self) -> Result<ProcessedIdentities> {
        self.read_json_or_default(IDENTITIES_KEY).await
    }

    async fn save_identities(&self, identities: &ProcessedIdentities) -> Result<()> {
        self.write_json(IDENTITIES_KEY, identities).await
    }

    async fn load_ledger(&self) -> Result<ReportLedger> {
        self.read_json_or_default(LEDGER_KEY).await
    }

    async fn save_ledger(&self, ledger: &ReportLedger) -> Result<()> {
        self.write_json(LEDGER_KEY, ledger).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert_eq!(storage.root_dir(), tmp.path());

        storage.write_bytes("saves/test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("saves/test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!tmp.path().join("saves/test.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let data = storage.read_bytes("nope.txt").await.unwrap();
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn test_fresh_store_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert_eq!(storage.load_checkpoint().await.unwrap().latest, None);
        assert!(storage.load_identities().await.unwrap().is_empty());
        assert!(storage.load_ledger().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkpoint_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let checkpoint = FeedCheckpoint {
            latest: Some("Fri, 05 Jan 2024 12:15:30 GMT".to_string()),
        };
        storage.save_checkpoint(&checkpoint).await.unwrap();
        assert_eq!(storage.load_checkpoint().await.unwrap(), checkpoint);

        let raw = std::fs::read_to_string(tmp.path().join(CHECKPOINT_KEY)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["latest"], "Fri, 05 Jan 2024 12:15:30 GMT");
    }

    #[tokio::test]
    async fn test_identities_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let identities: ProcessedIdentities = (1..=3)
            .map(|n| Identity::new(n.to_string(), format!("https://example.jma/{n}.xml")))
            .collect();
        storage.save_identities(&identities).await.unwrap();

        let loaded = storage.load_identities().await.unwrap();
        assert_eq!(loaded, identities);
        assert!(loaded.contains(&Identity::new("2", "https://example.jma/2.xml")));
    }

    #[tokio::test]
    async fn test_ledger_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let mut ledger = ReportLedger::new();
        ledger.record("地震がありました。");
        ledger.record("地震がありました。");
        storage.save_ledger(&ledger).await.unwrap();

        let loaded = storage.load_ledger().await.unwrap();
        assert_eq!(loaded, ledger);
        assert_eq!(loaded.count("地震がありました。"), 2);
    }

    #[tokio::test]
    async fn test_corrupt_state_is_error() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes(IDENTITIES_KEY, b"{not json").await.unwrap();
        assert!(storage.load_identities().await.is_err());
    }
}
