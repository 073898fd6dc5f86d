//! Best-effort poster lookup against an external movie database.
//!
//! # Invariants
//! - Only the first ranked search result is ever consulted.
//! - "No results" and "no poster on the first result" are `Ok(None)`.

use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum PosterLookupError {
    #[error("poster lookup is not configured")]
    NotConfigured,
    #[error("poster lookup transport error: {0}")]
    Transport(String),
    #[error("poster lookup rejected with status {0}")]
    Rejected(u16),
    #[error("poster lookup returned unexpected data: {0}")]
    Decode(String),
}

/// Read-only poster source consulted after the primary movie fetch.
#[async_trait]
pub trait PosterLookup: Send + Sync {
    /// Returns a full poster image URL for the best match of `title`.
    async fn find_poster(&self, title: &str) -> Result<Option<String>, PosterLookupError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    poster_path: Option<String>,
}

/// TMDB-compatible `search/movie` client.
#[derive(Debug, Clone)]
pub struct TmdbPosterLookup {
    client: Client,
    api_base_url: String,
    image_base_url: String,
    api_key: Option<String>,
}

impl TmdbPosterLookup {
    pub fn new(config: &ClientConfig) -> Result<Self, PosterLookupError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| PosterLookupError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            api_base_url: config.poster_api_base_url.clone(),
            image_base_url: config.poster_image_base_url.clone(),
            api_key: config.poster_api_key.clone(),
        })
    }
}

#[async_trait]
impl PosterLookup for TmdbPosterLookup {
    async fn find_poster(&self, title: &str) -> Result<Option<String>, PosterLookupError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(PosterLookupError::NotConfigured)?;

        let response = self
            .client
            .get(format!("{}/search/movie", self.api_base_url))
            .query(&[("api_key", api_key), ("query", title)])
            .send()
            .await
            .map_err(|err| PosterLookupError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterLookupError::Rejected(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|err| PosterLookupError::Decode(err.to_string()))?;
        Ok(first_poster_url(&self.image_base_url, body))
    }
}

fn first_poster_url(image_base_url: &str, response: SearchResponse) -> Option<String> {
    let path = response.results.into_iter().next()?.poster_path?;
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    Some(format!(
        "{}/{}",
        image_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}
