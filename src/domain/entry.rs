//! Cached payload record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored upstream response.
///
/// Entries are never mutated in place; a new fetch replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub stored_at: DateTime<Utc>,
    pub value: Value,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(value: Value) -> Self {
        Self {
            stored_at: Utc::now(),
            value,
        }
    }

    /// Creates an entry with an explicit timestamp.
    pub fn stored_at(value: Value, stored_at: DateTime<Utc>) -> Self {
        Self { stored_at, value }
    }

    /// Returns `true` once `now - stored_at` exceeds `ttl`.
    pub fn is_expired(&self, ttl: std::time::Duration, now: DateTime<Utc>) -> bool {
        let ttl = Duration::from_std(ttl).unwrap_or(Duration::MAX);
        now.signed_duration_since(self.stored_at) > ttl
    }
}
