//! reqwest-based client for the TMDB v3 API.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::domain::{RequestDescriptor, UpstreamClient, UpstreamError};

/// Public TMDB v3 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Fetches JSON documents from TMDB.
///
/// The API key is appended to every outbound URL here and nowhere else, so it
/// never participates in cache identity.
pub struct TmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl TmdbClient {
    /// Builds a client with a hard per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidUrl`] if `base_url` is not an absolute
    /// URL, or [`UpstreamError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tmdb-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            timeout,
        })
    }

    /// Full outbound URL for a request, credential included.
    fn request_url(&self, request: &RequestDescriptor) -> Result<Url, UpstreamError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path()))
            .map_err(|e| UpstreamError::InvalidUrl(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            for (name, value) in request.params() {
                query.append_pair(name, value);
            }
            query.append_pair("api_key", &self.api_key);
        }

        Ok(url)
    }

    fn map_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout(self.timeout.as_secs())
        } else if let Some(status) = e.status() {
            UpstreamError::Status {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.without_url().to_string())
        }
    }
}

#[async_trait]
impl UpstreamClient for TmdbClient {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<Value, UpstreamError> {
        let url = self.request_url(request)?;
        debug!("Upstream GET {}", request.path());

        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.map_error(e))?;

        response.json::<Value>().await.map_err(|e| self.map_error(e))
    }
}
