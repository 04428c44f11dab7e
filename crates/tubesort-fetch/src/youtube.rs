//! HTTP client for the YouTube Data API `videos` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use tubesort_core::{ExtractError, TitleSource, VideoLink};

/// YouTube Data API v3 video listing.
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Metadata client holding the endpoint and API key.
pub struct MetadataClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct VideoList {
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Deserialize)]
struct Snippet {
    title: String,
}

impl MetadataClient {
    /// `timeout` of `None` waits on the service indefinitely.
    pub fn new(
        api_url: String,
        api_key: String,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Title for `link`, or `None` on any failure (logged).
    pub async fn extract(&self, link: &VideoLink) -> Option<String> {
        match self.fetch_title(link).await {
            Ok(title) => Some(title),
            Err(e) => {
                warn!(link = %link, error = %e, "title extraction failed");
                None
            }
        }
    }

    async fn lookup(&self, id: &str) -> Result<String, ExtractError> {
        debug!(url = %self.api_url, id, "querying video metadata");
        let resp = self
            .client
            .get(&self.api_url)
            .query(&[("id", id), ("key", self.api_key.as_str()), ("part", "snippet")])
            .send()
            .await
            // The request URL carries the key.
            .map_err(|e| ExtractError::Network(e.without_url().to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ExtractError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ExtractError::Network(e.without_url().to_string()))?;
        let list: VideoList = serde_json::from_slice(&body)
            .map_err(|e| ExtractError::Malformed(e.to_string()))?;

        let item = list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ExtractError::NotFound(id.to_string()))?;
        if item.snippet.title.is_empty() {
            return Err(ExtractError::EmptyTitle);
        }

        info!(id, title = %item.snippet.title, "resolved video title");
        Ok(item.snippet.title)
    }
}

#[async_trait]
impl TitleSource for MetadataClient {
    async fn fetch_title(&self, link: &VideoLink) -> Result<String, ExtractError> {
        self.lookup(link.video_id()).await
    }
}
