//! Outbound delivery of finalized bulletins.
//!
//! - `Notifier`: broadcast seam (`LineNotifier`, `ConsoleNotifier`)
//! - `template`: flex payload rendering
//! - `StopCondition`: post-delivery stop check (`StopFile`)

pub mod console;
pub mod line;
pub mod stop;
pub mod template;

pub use console::ConsoleNotifier;
pub use line::LineNotifier;
pub use stop::{StopCondition, StopFile};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::BulletinRecord;

/// Push-messaging collaborator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Broadcast one rendered bulletin.
    async fn broadcast(&self, record: &BulletinRecord) -> Result<()>;

    /// Broadcast a plain text message.
    async fn broadcast_text(&self, text: &str) -> Result<()>;
}

/// Deliver records in order and return how many failed.
///
/// A failure is logged and delivery moves on to the next record.
pub async fn deliver_all(notifier: &dyn Notifier, records: &[BulletinRecord]) -> usize {
    let mut failures = 0;
    for record in records {
        match notifier.broadcast(record).await {
            Ok(()) => log::info!("Delivered {} [{}]", record.kind, record.identity),
            Err(e) => {
                failures += 1;
                log::error!("Delivery failed for {}: {}", record.identity, e);
            }
        }
    }
    failures
}
