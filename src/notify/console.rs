//! Notifier that only logs, for dry runs.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::BulletinRecord;
use crate::notify::Notifier;
use crate::notify::template::detail_lines;

#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn broadcast(&self, record: &BulletinRecord) -> Result<()> {
        log::info!("[dry-run] {}", record.title.replace('\n', " "));
        log::info!("    {}", record.body);
        for line in detail_lines(record) {
            log::info!("    {}", line);
        }
        if let Some(info) = &record.info {
            log::info!("    {}", info);
        }
        Ok(())
    }

    async fn broadcast_text(&self, text: &str) -> Result<()> {
        log::info!("[dry-run] {}", text);
        Ok(())
    }
}
