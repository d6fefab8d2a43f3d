//! Bulletin data structures.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Intensity or kind label mapped to the joined names of its areas,
/// in document order.
pub type AreaMap = IndexMap<String, String>;

/// The bulletin families this watcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletinKind {
    /// 震度速報
    IntensityBulletin,
    /// 震源に関する情報
    Hypocenter,
    /// 震源・震度に関する情報
    HypocenterIntensity,
    /// 緊急地震速報（予報）
    EarlyWarningForecast,
    /// 緊急地震速報（警報）
    EarlyWarningAlarm,
    /// Any feed title mentioning 津波
    Tsunami,
}

impl BulletinKind {
    /// Display title for the record, or `None` when the document supplies it.
    pub fn display_title(&self) -> Option<&'static str> {
        match self {
            Self::IntensityBulletin => Some("震度速報"),
            Self::Hypocenter => Some("震源に関する情報"),
            Self::HypocenterIntensity => Some("震源・震度に関する情報"),
            Self::EarlyWarningForecast => Some("緊急地震速報(予報)"),
            Self::EarlyWarningAlarm => Some("緊急地震速報 (警報)"),
            Self::Tsunami => None,
        }
    }

    /// Whether repeated bulletins with the same body get a "第N報" suffix.
    pub fn is_sequenced(&self) -> bool {
        matches!(self, Self::IntensityBulletin | Self::HypocenterIntensity)
    }
}

impl fmt::Display for BulletinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IntensityBulletin => "intensity bulletin",
            Self::Hypocenter => "hypocenter",
            Self::HypocenterIntensity => "hypocenter and intensity",
            Self::EarlyWarningForecast => "early warning (forecast)",
            Self::EarlyWarningAlarm => "early warning (alarm)",
            Self::Tsunami => "tsunami",
        };
        f.write_str(name)
    }
}

/// One feed item of the current poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletinEntry {
    /// Raw feed title, used for classification
    pub title: String,

    /// Absolute URL of the detail document
    pub detail_url: String,
}

/// Deduplication key: "have we already reported this detail document".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub event_id: String,
    pub url: String,
}

impl Identity {
    pub fn new(event_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.event_id, self.url)
    }
}

/// Normalized output of a bulletin parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletinRecord {
    /// Bulletin family the record was parsed as
    pub kind: BulletinKind,

    /// Display category, possibly with a sequence suffix
    pub title: String,

    /// Headline text
    pub body: String,

    /// Forecast comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,

    /// Rendered area lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub areas: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<String>,

    /// Epicenter name, or the first affected area for tsunami bulletins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    /// Raw `MaxInt` value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_intensity: Option<String>,

    pub identity: Identity,
}

impl BulletinRecord {
    /// Create a record with only the mandatory fields set.
    pub fn new(
        kind: BulletinKind,
        title: impl Into<String>,
        body: impl Into<String>,
        identity: Identity,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            info: None,
            areas: None,
            magnitude: None,
            area: None,
            max_intensity: None,
            identity,
        }
    }

    /// Append the "第N報" suffix used for repeated bulletins.
    pub fn mark_report_number(&mut self, number: u32) {
        self.title.push_str(&format!("\n第{number}報"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequenced_kinds() {
        assert!(BulletinKind::IntensityBulletin.is_sequenced());
        assert!(BulletinKind::HypocenterIntensity.is_sequenced());
        assert!(!BulletinKind::Hypocenter.is_sequenced());
        assert!(!BulletinKind::Tsunami.is_sequenced());
    }

    #[test]
    fn test_mark_report_number() {
        let mut record = BulletinRecord::new(
            BulletinKind::IntensityBulletin,
            "震度速報",
            "body",
            Identity::new("1", "https://example.com/1.xml"),
        );
        record.mark_report_number(2);
        assert_eq!(record.title, "震度速報\n第2報");
    }

    #[test]
    fn test_identity_json_shape() {
        let identity = Identity::new("20240101000000", "https://example.com/a.xml");
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["event_id"], "20240101000000");
        assert_eq!(json["url"], "https://example.com/a.xml");
    }
}
