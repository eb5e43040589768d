//! Cached access to the TMDB resources exposed by the proxy.

use serde_json::Value;
use std::sync::Arc;

use crate::application::services::CacheAside;
use crate::domain::{RequestDescriptor, UpstreamClient, UpstreamError};
use crate::infrastructure::cache::{CacheResult, Namespace};

/// Namespace under which every TMDB response is cached.
pub const TMDB_NAMESPACE: &str = "tmdb";

/// Language used when the caller does not pass one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Service for fetching TMDB documents through the cache.
///
/// Builds a [`RequestDescriptor`] per operation from content-affecting
/// parameters only and routes it through [`CacheAside`].
pub struct TmdbService {
    cache: CacheAside,
    upstream: Arc<dyn UpstreamClient>,
    namespace: Namespace,
}

impl TmdbService {
    /// Creates a new TMDB service.
    pub fn new(cache: CacheAside, upstream: Arc<dyn UpstreamClient>) -> CacheResult<Self> {
        Ok(Self {
            cache,
            upstream,
            namespace: Namespace::new(TMDB_NAMESPACE)?,
        })
    }

    /// Searches movies by title.
    ///
    /// # Arguments
    ///
    /// - `query` - search text, passed through unchanged
    /// - `language` - locale, defaults to `en-US`
    /// - `page` - 1-based result page, defaults to 1
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the request misses the cache and the upstream call fails.
    pub async fn search(
        &self,
        query: &str,
        language: Option<&str>,
        page: Option<u32>,
    ) -> Result<Value, UpstreamError> {
        let request = RequestDescriptor::new("/search/movie")
            .param("query", query)
            .param("language", language.unwrap_or(DEFAULT_LANGUAGE))
            .param("page", page.unwrap_or(1).to_string());

        self.fetch(request).await
    }

    /// Fetches movie details, optionally with appended sub-resources
    /// (e.g. `videos,credits`).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::InvalidUrl`] for an id rejected by [`is_valid_movie_id`],
    /// or [`UpstreamError`] if the request misses the cache and the upstream call fails.
    pub async fn movie(
        &self,
        id: &str,
        append_to_response: Option<&str>,
        language: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        if !is_valid_movie_id(id) {
            return Err(UpstreamError::InvalidUrl(format!("invalid movie id '{}'", id)));
        }

        let request = RequestDescriptor::new(movie_path(id))
            .param_opt("append_to_response", append_to_response)
            .param("language", language.unwrap_or(DEFAULT_LANGUAGE));

        self.fetch(request).await
    }

    /// Fetches the API configuration document (image base URLs, sizes).
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] if the request misses the cache and the upstream call fails.
    pub async fn configuration(&self) -> Result<Value, UpstreamError> {
        self.fetch(RequestDescriptor::new("/configuration")).await
    }

    async fn fetch(&self, request: RequestDescriptor) -> Result<Value, UpstreamError> {
        self.cache
            .get_or_compute(&self.namespace, &request, || self.upstream.fetch(&request))
            .await
    }
}

/// An id must name a path segment below `/movie`. Empty ids and ids made of
/// dots only would be resolved by the URL parser as `.` or `..` segments.
pub fn is_valid_movie_id(id: &str) -> bool {
    !id.is_empty() && !id.chars().all(|c| c == '.')
}

/// `/movie/{id}` with the id encoded as a single path segment.
fn movie_path(id: &str) -> String {
    format!(
        "/movie/{}",
        percent_encoding::utf8_percent_encode(id, percent_encoding::NON_ALPHANUMERIC)
    )
}
