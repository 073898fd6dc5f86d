//! Process-wide client configuration.
//!
//! Built once by the host (FFI init or CLI) and passed by reference into
//! every gateway constructor.

use std::time::Duration;

pub const DEFAULT_POSTER_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_POSTER_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),
    #[error("invalid value `{value}` for `{key}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, e.g. `https://api.example.com/api/`.
    pub api_base_url: String,
    pub poster_api_base_url: String,
    pub poster_image_base_url: String,
    /// Poster enrichment is skipped when no key is configured.
    pub poster_api_key: Option<String>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(api_base_url.into()),
            poster_api_base_url: DEFAULT_POSTER_API_BASE_URL.to_string(),
            poster_image_base_url: DEFAULT_POSTER_IMAGE_BASE_URL.to_string(),
            poster_api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn with_poster_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.poster_api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    pub fn with_poster_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.poster_api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reads settings from `MARQUEE_*` environment variables.
    ///
    /// - `MARQUEE_API_BASE_URL` (required)
    /// - `MARQUEE_POSTER_API_KEY`, `MARQUEE_POSTER_API_BASE_URL`
    /// - `MARQUEE_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var("MARQUEE_API_BASE_URL")
            .map_err(|_| ConfigError::Missing("MARQUEE_API_BASE_URL"))?;
        let mut config = Self::new(base);

        if let Ok(key) = std::env::var("MARQUEE_POSTER_API_KEY") {
            config = config.with_poster_api_key(key);
        }
        if let Ok(url) = std::env::var("MARQUEE_POSTER_API_BASE_URL") {
            config = config.with_poster_api_base_url(url);
        }
        if let Ok(raw) = std::env::var("MARQUEE_REQUEST_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: "MARQUEE_REQUEST_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Joins an endpoint path onto the backend root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}
