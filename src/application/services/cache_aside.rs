//! Cache-aside lookups over the backend selected at startup.

use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::{CacheEntry, RequestDescriptor};
use crate::infrastructure::cache::{CacheBackend, Namespace, derive_key};

/// Checks the backend before computing, and stores what was computed.
///
/// Holds no per-entry state. Concurrent misses on one key may each call the
/// compute function and each write the result; the last write wins.
#[derive(Clone)]
pub struct CacheAside {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl CacheAside {
    /// Wraps the backend chosen at startup.
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Returns the cached value for `request`, or computes and stores it.
    ///
    /// # Behavior
    ///
    /// - **Hit**: returned without calling `compute`
    /// - **Miss / backend read error / undecodable hit**: `compute` runs
    /// - **Compute error**: returned as-is, nothing is stored
    /// - **Store error**: logged, the computed value is still returned
    ///
    /// # Errors
    ///
    /// Only errors produced by `compute` are returned.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        namespace: &Namespace,
        request: &RequestDescriptor,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = derive_key(namespace, request);
        let backend = self.backend.name();

        match self.backend.get(&key).await {
            Ok(Some(entry)) => match serde_json::from_value::<T>(entry.value) {
                Ok(value) => {
                    debug!("Cache HIT: {}", key);
                    metrics::counter!("tmdb_proxy_cache_hits_total", "backend" => backend)
                        .increment(1);
                    return Ok(value);
                }
                Err(e) => warn!("Cached value for {} has unexpected shape: {}", key, e),
            },
            Ok(None) => debug!("Cache MISS: {}", key),
            Err(e) => warn!("Cache read failed for {}, treating as miss: {}", key, e),
        }
        metrics::counter!("tmdb_proxy_cache_misses_total", "backend" => backend).increment(1);

        let value = compute().await?;

        match serde_json::to_value(&value) {
            Ok(json) => {
                if let Err(e) = self.backend.set(&key, &CacheEntry::new(json), self.ttl).await {
                    warn!("Cache write failed for {}: {}", key, e);
                    metrics::counter!("tmdb_proxy_cache_store_errors_total", "backend" => backend)
                        .increment(1);
                }
            }
            Err(e) => warn!("Computed value for {} is not cacheable: {}", key, e),
        }

        Ok(value)
    }
}
