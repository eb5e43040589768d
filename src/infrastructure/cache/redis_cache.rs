//! Redis-backed cache implementation.

use super::key::CacheKey;
use super::service::{CacheBackend, CacheError, CacheResult};
use crate::domain::CacheEntry;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis cache with server-enforced expiry.
///
/// Entries are written with `SET .. EX ttl`, so Redis deletes them on its own
/// once the TTL elapses. The connection manager is cloned per command and
/// reconnects transparently after a drop.
pub struct RedisCache {
    client: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379/0"`)
    /// - `op_timeout` - upper bound applied to every GET/SET
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let cache = Self {
            client: manager,
            op_timeout,
        };

        let mut conn = cache.client.clone();
        cache
            .bounded(conn.ping::<()>())
            .await?
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(cache)
    }

    /// Runs a Redis command under the per-operation timeout.
    async fn bounded<T>(&self, op: impl Future<Output = T>) -> CacheResult<T> {
        tokio::time::timeout(self.op_timeout, op)
            .await
            .map_err(|_| CacheError::Timeout(self.op_timeout))
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        let mut conn = self.client.clone();

        let raw = self
            .bounded(conn.get::<_, Option<String>>(key.as_str()))
            .await?
            .map_err(|e| CacheError::Connection(format!("Redis GET failed: {}", e)))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!("Discarding undecodable Redis entry {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &CacheKey, entry: &CacheEntry, ttl: Duration) -> CacheResult<()> {
        let payload = serde_json::to_string(entry)?;
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.as_secs().max(1);

        self.bounded(conn.set_ex::<_, _, ()>(key.as_str(), payload, ttl_seconds))
            .await?
            .map_err(|e| CacheError::Connection(format!("Redis SET failed: {}", e)))?;

        debug!("Redis SET {} (TTL: {}s)", key, ttl_seconds);
        Ok(())
    }
}
