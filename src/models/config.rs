//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Delay between two poll cycles. Fixed, not read from the config file.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bulletin feed and HTTP client settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Push delivery settings
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.user_agent.trim().is_empty() {
            return Err(AppError::validation("feed.user_agent is empty"));
        }
        if self.feed.timeout_secs == 0 {
            return Err(AppError::validation("feed.timeout_secs must be > 0"));
        }
        if self.notifier.timeout_secs == 0 {
            return Err(AppError::validation("notifier.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.feed.url)
            .map_err(|e| AppError::validation(format!("feed.url is invalid: {e}")))?;
        url::Url::parse(&self.notifier.broadcast_url)
            .map_err(|e| AppError::validation(format!("notifier.broadcast_url is invalid: {e}")))?;
        Ok(())
    }
}

/// Feed location and HTTP client behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Atom feed listing recent bulletins
    #[serde(default = "defaults::feed_url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: defaults::feed_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Push-messaging endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Broadcast endpoint of the messaging platform
    #[serde(default = "defaults::broadcast_url")]
    pub broadcast_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::notifier_timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            broadcast_url: defaults::broadcast_url(),
            timeout_secs: defaults::notifier_timeout(),
        }
    }
}

mod defaults {
    pub fn feed_url() -> String {
        "http://www.data.jma.go.jp/developer/xml/feed/eqvol.xml".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; quakefeed/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn broadcast_url() -> String {
        "https://api.line.me/v2/bot/message/broadcast".into()
    }
    pub fn notifier_timeout() -> u64 {
        10
    }
}
