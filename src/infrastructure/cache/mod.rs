//! Cache backends and key derivation.
//!
//! Provides a [`CacheBackend`] trait with two implementations, one of which is
//! chosen at startup:
//! - [`RedisCache`] - Redis with server-side TTL, selected when Redis is configured
//! - [`FileCache`] - One JSON file per entry with lazy expiry, used otherwise
//!
//! Keys come from [`derive_key`], which combines a [`Namespace`] with a
//! SHA-256 fingerprint of the request.

mod file_cache;
mod key;
mod redis_cache;
mod service;
mod sweeper;

pub use file_cache::{CacheStats, FileCache, SweepReport, decode_file_name, encode_file_name};
pub use key::{CacheKey, KEY_SEPARATOR, Namespace, derive_key, fingerprint};
pub use redis_cache::RedisCache;
pub use service::{CacheBackend, CacheError, CacheResult};
pub use sweeper::run_sweeper;

#[cfg(test)]
pub use service::MockCacheBackend;
