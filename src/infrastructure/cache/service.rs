//! Cache backend trait and error types.

use async_trait::async_trait;
use std::time::Duration;

use super::key::CacheKey;
use crate::domain::CacheEntry;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid cache namespace '{0}': use 1-64 ASCII letters, digits, '-' or '_'")]
    InvalidNamespace(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Storage capability shared by every cache backend.
///
/// A normal miss, an expired entry and a corrupt record all come back as
/// `Ok(None)`. `Err` is reserved for the medium itself failing (connection
/// loss, disk errors), which callers treat as a miss on read and a dropped
/// write on write.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with server-side TTL
/// - [`crate::infrastructure::cache::FileCache`] - one file per entry, lazy expiry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short backend name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Looks up an entry.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))` on hit
    /// - `Ok(None)` on miss, expiry, or an undecodable record
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] only when the storage medium is unavailable.
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>>;

    /// Stores an entry, replacing any previous one for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the write could not be completed. Callers
    /// log it and carry on.
    async fn set(&self, key: &CacheKey, entry: &CacheEntry, ttl: Duration) -> CacheResult<()>;
}
