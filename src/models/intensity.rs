//! JMA seismic intensity scale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One step of the JMA seismic intensity scale, as written in `MaxInt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeismicIntensity {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5-")]
    FiveLower,
    #[serde(rename = "5+")]
    FiveUpper,
    #[serde(rename = "6-")]
    SixLower,
    #[serde(rename = "6+")]
    SixUpper,
    #[serde(rename = "7")]
    Seven,
}

impl SeismicIntensity {
    /// Lowest intensity that is worth a broadcast.
    pub const REPORT_THRESHOLD: Self = Self::Three;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::FiveLower => "5-",
            Self::FiveUpper => "5+",
            Self::SixLower => "6-",
            Self::SixUpper => "6+",
            Self::Seven => "7",
        }
    }

    /// Whether a raw `MaxInt` value passes the severity filter.
    ///
    /// Unrecognized values (e.g. `"5"`) never pass.
    pub fn is_reportable(raw: &str) -> bool {
        raw.parse::<Self>()
            .map(|level| level >= Self::REPORT_THRESHOLD)
            .unwrap_or(false)
    }
}

impl FromStr for SeismicIntensity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            "3" => Ok(Self::Three),
            "4" => Ok(Self::Four),
            "5-" => Ok(Self::FiveLower),
            "5+" => Ok(Self::FiveUpper),
            "6-" => Ok(Self::SixLower),
            "6+" => Ok(Self::SixUpper),
            "7" => Ok(Self::Seven),
            other => Err(AppError::validation(format!(
                "unknown seismic intensity '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SeismicIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
