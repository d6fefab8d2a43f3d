//! Feed entry classification and bulletin collection.
//!
//! Maps each feed title onto a bulletin family, fetches the linked detail
//! document and runs the matching parser.

use crate::error::Result;
use crate::models::{BulletinEntry, BulletinKind, BulletinRecord};
use crate::parser::bulletins::intensity_fallback;
use crate::parser::{parse_bulletin, parse_entries};
use crate::services::Fetch;

/// Substring marking any tsunami-related feed title.
pub const TSUNAMI_TOKEN: &str = "津波";

/// Classify a feed title. Unknown titles yield `None`.
pub fn classify(title: &str) -> Option<BulletinKind> {
    match title {
        "震度速報" => Some(BulletinKind::IntensityBulletin),
        "震源に関する情報" => Some(BulletinKind::Hypocenter),
        "震源・震度に関する情報" => Some(BulletinKind::HypocenterIntensity),
        "緊急地震速報（予報）" => Some(BulletinKind::EarlyWarningForecast),
        "緊急地震速報（警報）" => Some(BulletinKind::EarlyWarningAlarm),
        t if t.contains(TSUNAMI_TOKEN) => Some(BulletinKind::Tsunami),
        _ => None,
    }
}

/// Turns a feed body into parsed records, in feed order (newest first).
pub struct BulletinCollector<'a> {
    fetcher: &'a dyn Fetch,
}

impl<'a> BulletinCollector<'a> {
    pub fn new(fetcher: &'a dyn Fetch) -> Self {
        Self { fetcher }
    }

    /// Classify every feed entry and parse the matching ones.
    ///
    /// A malformed feed yields no records. An intensity bulletin that cannot
    /// be fetched or read becomes a placeholder record. Any other detail
    /// document that cannot be fetched or parsed fails the whole collection.
    pub async fn collect(&self, feed_body: &str, feed_url: &str) -> Result<Vec<BulletinRecord>> {
        let entries = match parse_entries(feed_body, feed_url) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Feed is not well-formed, skipping cycle: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::new();
        let mut matched = 0;
        for entry in &entries {
            let Some(kind) = classify(&entry.title) else {
                log::debug!("Ignoring feed entry '{}'", entry.title);
                continue;
            };
            matched += 1;

            if let Some(record) = self.collect_entry(kind, entry).await? {
                records.push(record);
            }
        }

        log::info!(
            "Classified {} of {} feed entries, {} records parsed",
            matched,
            entries.len(),
            records.len()
        );
        Ok(records)
    }

    async fn collect_entry(
        &self,
        kind: BulletinKind,
        entry: &BulletinEntry,
    ) -> Result<Option<BulletinRecord>> {
        log::debug!("Fetching {} from {}", kind, entry.detail_url);
        let xml = match self.fetcher.fetch_document(&entry.detail_url).await {
            Ok(xml) => xml,
            Err(e) if kind == BulletinKind::IntensityBulletin => {
                log::warn!(
                    "Could not fetch intensity bulletin {}: {}. Using placeholder.",
                    entry.detail_url,
                    e
                );
                return Ok(Some(intensity_fallback(&entry.detail_url)));
            }
            Err(e) => return Err(e),
        };
        parse_bulletin(kind, &xml, &entry.detail_url).map_err(|e| {
            log::error!("Failed to parse {} at {}: {}", kind, entry.detail_url, e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_titles() {
        assert_eq!(classify("震度速報"), Some(BulletinKind::IntensityBulletin));
        assert_eq!(classify("震源に関する情報"), Some(BulletinKind::Hypocenter));
        assert_eq!(
            classify("震源・震度に関する情報"),
            Some(BulletinKind::HypocenterIntensity)
        );
        assert_eq!(
            classify("緊急地震速報（予報）"),
            Some(BulletinKind::EarlyWarningForecast)
        );
        assert_eq!(
            classify("緊急地震速報（警報）"),
            Some(BulletinKind::EarlyWarningAlarm)
        );
    }

    #[test]
    fn test_exact_match_is_required() {
        assert_eq!(classify("震度速報 "), None);
        assert_eq!(classify("緊急地震速報(予報)"), None);
        assert_eq!(classify("顕著な地震の震源要素更新のお知らせ"), None);
    }

    #[test]
    fn test_tsunami_substring() {
        assert_eq!(classify("津波警報・注意報・予報a"), Some(BulletinKind::Tsunami));
        assert_eq!(classify("津波情報a"), Some(BulletinKind::Tsunami));
        assert_eq!(classify("沖合の津波観測に関する情報"), Some(BulletinKind::Tsunami));
    }

    #[test]
    fn test_unrelated_titles_are_dropped() {
        assert_eq!(classify("噴火警報・予報"), None);
        assert_eq!(classify(""), None);
    }
}
