// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::{FeedConfig, NotifierConfig};

/// Create the client used for the feed and its detail documents.
pub fn create_feed_client(config: &FeedConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Create the client used for push delivery.
pub fn create_notifier_client(config: &NotifierConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a URL and return its body decoded as UTF-8.
///
/// Invalid byte sequences are replaced rather than rejected.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let bytes = client.get(url).send().await?.error_for_status()?.bytes().await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
