//! Flex message payloads for bulletin records.
//!
//! ```text
//! ┌──────────────────────────┐
//! │ 震源・震度に関する情報   │  header: title (with 第N報)
//! ├──────────────────────────┤
//! │ ３日１２時０５分ころ…    │  body text
//! │ [震度４] 土浦市          │  area lines
//! │ 震源地: 茨城県南部       │  per-kind details
//! │ マグニチュード: 5.0      │
//! │ 最大震度: 4              │
//! │ この地震による津波の…    │  forecast comment
//! └──────────────────────────┘
//! ```

use serde_json::{Value, json};

use crate::models::{BulletinKind, BulletinRecord};

/// Upper bound the messaging platform puts on `altText`.
pub const ALT_TEXT_LIMIT: usize = 400;

/// Short text shown in notifications and chat lists.
pub fn alt_text(record: &BulletinRecord) -> String {
    let text = if record.body.is_empty() {
        &record.title
    } else {
        &record.body
    };
    text.chars().take(ALT_TEXT_LIMIT).collect()
}

/// Body lines below the headline text, in display order.
pub fn detail_lines(record: &BulletinRecord) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(areas) = &record.areas {
        lines.extend(areas.iter().cloned());
    }

    if let Some(area) = &record.area {
        let label = match record.kind {
            BulletinKind::Tsunami => "エリア",
            _ => "震源地",
        };
        lines.push(format!("{label}: {area}"));
    }
    if let Some(magnitude) = &record.magnitude {
        lines.push(format!("マグニチュード: {magnitude}"));
    }
    if let Some(max_intensity) = &record.max_intensity {
        lines.push(format!("最大震度: {max_intensity}"));
    }

    lines
}

/// Render a record as a flex "bubble".
pub fn render_payload(record: &BulletinRecord) -> Value {
    let mut contents = Vec::new();
    if !record.body.is_empty() {
        contents.push(text_block(&record.body, "md"));
    }
    let details = detail_lines(record);
    if !details.is_empty() {
        contents.push(json!({ "type": "separator", "margin": "md" }));
        contents.extend(details.iter().map(|line| text_block(line, "sm")));
    }
    if let Some(info) = record.info.as_deref().filter(|info| !info.is_empty()) {
        contents.push(json!({ "type": "separator", "margin": "md" }));
        contents.push(text_block(info, "xs"));
    }
    if contents.is_empty() {
        contents.push(text_block("No data.", "md"));
    }

    json!({
        "type": "bubble",
        "header": {
            "type": "box",
            "layout": "vertical",
            "contents": [{
                "type": "text",
                "text": record.title,
                "weight": "bold",
                "size": "lg",
                "wrap": true
            }]
        },
        "body": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": contents
        }
    })
}

fn text_block(text: &str, size: &str) -> Value {
    json!({ "type": "text", "text": text, "size": size, "wrap": true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;

    fn hypocenter_record() -> BulletinRecord {
        let mut record = BulletinRecord::new(
            BulletinKind::HypocenterIntensity,
            "震源・震度に関する情報\n第2報",
            "地震がありました。",
            Identity::new("1", "https://example.jma/1.xml"),
        );
        record.areas = Some(vec!["[震度４] 土浦市".to_string()]);
        record.area = Some("茨城県南部".to_string());
        record.magnitude = Some("5.0".to_string());
        record.max_intensity = Some("4".to_string());
        record.info = Some("この地震による津波の心配はありません。".to_string());
        record
    }

    #[test]
    fn test_detail_lines_order() {
        assert_eq!(
            detail_lines(&hypocenter_record()),
            vec![
                "[震度４] 土浦市".to_string(),
                "震源地: 茨城県南部".to_string(),
                "マグニチュード: 5.0".to_string(),
                "最大震度: 4".to_string(),
            ]
        );
    }

    #[test]
    fn test_tsunami_area_label() {
        let mut record = BulletinRecord::new(
            BulletinKind::Tsunami,
            "津波警報",
            "津波警報を発表しました。",
            Identity::new("1", "https://example.jma/1.xml"),
        );
        record.area = Some("石川県能登".to_string());
        assert_eq!(detail_lines(&record), vec!["エリア: 石川県能登".to_string()]);
    }

    #[test]
    fn test_payload_shape() {
        let payload = render_payload(&hypocenter_record());
        assert_eq!(payload["type"], "bubble");
        assert_eq!(payload["header"]["contents"][0]["text"], "震源・震度に関する情報\n第2報");

        let body = payload["body"]["contents"].as_array().unwrap();
        assert_eq!(body[0]["text"], "地震がありました。");
        assert_eq!(
            body.last().unwrap()["text"],
            "この地震による津波の心配はありません。"
        );
    }

    #[test]
    fn test_empty_body_still_renders_content() {
        let record = BulletinRecord::new(
            BulletinKind::EarlyWarningForecast,
            "緊急地震速報(予報)",
            "",
            Identity::new("1", "https://example.jma/1.xml"),
        );
        let payload = render_payload(&record);
        assert_eq!(payload["body"]["contents"][0]["text"], "No data.");
        assert_eq!(alt_text(&record), "緊急地震速報(予報)");
    }

    #[test]
    fn test_alt_text_is_truncated() {
        let record = BulletinRecord::new(
            BulletinKind::Hypocenter,
            "震源に関する情報",
            "あ".repeat(500),
            Identity::new("1", "https://example.jma/1.xml"),
        );
        assert_eq!(alt_text(&record).chars().count(), ALT_TEXT_LIMIT);
    }
}
