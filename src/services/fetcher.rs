//! Feed and detail document retrieval.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::LAST_MODIFIED;

use crate::error::Result;
use crate::models::FeedConfig;
use crate::utils::http;

/// Body and modification marker of one feed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    /// `Last-Modified` header, verbatim
    pub last_modified: Option<String>,
    pub body: String,
}

/// Source of the feed and its linked documents.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the feed. Any error means the feed could not be reached.
    async fn fetch_feed(&self, url: &str) -> Result<FeedResponse>;

    /// Fetch one detail document.
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

/// HTTP implementation backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        Ok(Self::new(http::create_feed_client(config)?))
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_feed(&self, url: &str) -> Result<FeedResponse> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        Ok(FeedResponse {
            last_modified,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    async fn fetch_document(&self, url: &str) -> Result<String> {
        http::fetch_text(&self.client, url).await
    }
}
