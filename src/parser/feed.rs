//! Atom feed entry list.

use crate::error::Result;
use crate::models::BulletinEntry;
use crate::parser::document;
use crate::utils::resolve;

/// Parse the feed body into its entries, newest first as published.
///
/// Entries without a link are skipped. Relative links are resolved against
/// `feed_url`.
pub fn parse_entries(xml: &str, feed_url: &str) -> Result<Vec<BulletinEntry>> {
    let doc = document::parse(xml)?;
    let feed = doc.root_element();

    let entries = document::children(feed, "entry")
        .filter_map(|entry| {
            let title = document::text_at(entry, &["title"])?;
            let href = document::children(entry, "link")
                .find_map(|link| link.attribute("href"))?
                .trim();
            if href.is_empty() {
                return None;
            }
            let detail_url = resolve(feed_url, href).unwrap_or_else(|| href.to_string());
            Some(BulletinEntry { title, detail_url })
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_URL: &str = "http://www.data.jma.go.jp/developer/xml/feed/eqvol.xml";

    #[test]
    fn test_parse_entries() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" lang="ja">
  <title>高頻度（地震火山）</title>
  <updated>2024-01-01T00:00:30+09:00</updated>
  <entry>
    <title>震度速報</title>
    <link type="application/xml" href="http://www.data.jma.go.jp/developer/xml/data/a.xml"/>
  </entry>
  <entry>
    <title>津波警報・注意報・予報a</title>
    <link type="application/xml" href="data/b.xml"/>
  </entry>
  <entry>
    <title>リンクなし</title>
  </entry>
</feed>"#;

        let entries = parse_entries(xml, FEED_URL).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "震度速報");
        assert_eq!(
            entries[0].detail_url,
            "http://www.data.jma.go.jp/developer/xml/data/a.xml"
        );
        assert_eq!(
            entries[1].detail_url,
            "http://www.data.jma.go.jp/developer/xml/feed/data/b.xml"
        );
    }

    #[test]
    fn test_malformed_feed_is_error() {
        assert!(parse_entries("<feed><entry></feed>", FEED_URL).is_err());
    }

    #[test]
    fn test_empty_feed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        assert!(parse_entries(xml, FEED_URL).unwrap().is_empty());
    }
}
