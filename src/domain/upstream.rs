//! Upstream fetch contract.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::request::RequestDescriptor;

/// Failures talking to the upstream metadata API.
///
/// None of these are ever written to the cache.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream request timed out after {0}s")]
    Timeout(u64),

    #[error("upstream returned status {status}")]
    Status { status: u16 },

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream response was not valid JSON: {0}")]
    Decode(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// Issues a request to the upstream API.
///
/// # Implementations
///
/// - [`crate::infrastructure::tmdb::TmdbClient`] - reqwest-based TMDB client
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Fetches the JSON document for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] on timeout, transport failure, non-success
    /// status, or an undecodable body.
    async fn fetch(&self, request: &RequestDescriptor) -> Result<Value, UpstreamError>;
}
