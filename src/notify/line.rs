//! LINE Messaging API broadcaster.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::{BulletinRecord, NotifierConfig};
use crate::notify::Notifier;
use crate::notify::template::{alt_text, render_payload};
use crate::utils::http;

/// Broadcasts every message to all followers of the channel.
pub struct LineNotifier {
    client: Client,
    endpoint: String,
    token: String,
}

impl LineNotifier {
    pub fn new(client: Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn from_config(config: &NotifierConfig, token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::config("LINE channel token is empty"));
        }
        let client = http::create_notifier_client(config)?;
        Ok(Self::new(client, &config.broadcast_url, token))
    }

    async fn send(&self, message: Value) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({ "messages": [message] }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(AppError::delivery(format!("broadcast returned {status}: {detail}")))
    }
}

/// Flex message wrapping a rendered record.
pub fn flex_message(record: &BulletinRecord) -> Value {
    json!({
        "type": "flex",
        "altText": alt_text(record),
        "contents": render_payload(record),
    })
}

#[async_trait]
impl Notifier for LineNotifier {
    async fn broadcast(&self, record: &BulletinRecord) -> Result<()> {
        self.send(flex_message(record)).await
    }

    async fn broadcast_text(&self, text: &str) -> Result<()> {
        self.send(json!({ "type": "text", "text": text })).await
    }
}
