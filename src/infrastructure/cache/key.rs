//! Deterministic cache key derivation.

use sha2::{Digest, Sha256};
use std::fmt;

use super::service::{CacheError, CacheResult};
use crate::domain::RequestDescriptor;

/// Separator between namespace and fingerprint.
pub const KEY_SEPARATOR: char = ':';

const MAX_NAMESPACE_LEN: usize = 64;

/// Logical partition of the key space, e.g. one per upstream API.
///
/// Only ASCII alphanumerics, `-` and `_` are accepted, so the key separator
/// can never appear inside a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Validates and wraps a namespace tag.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidNamespace`] if the tag is empty, longer
    /// than 64 bytes, or contains any other character.
    pub fn new(tag: impl Into<String>) -> CacheResult<Self> {
        let tag = tag.into();

        let valid = !tag.is_empty()
            && tag.len() <= MAX_NAMESPACE_LEN
            && tag
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        if valid {
            Ok(Self(tag))
        } else {
            Err(CacheError::InvalidNamespace(tag))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully derived cache key: `namespace:fingerprint`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns the lowercase hex SHA-256 of the descriptor's canonical form.
pub fn fingerprint(descriptor: &RequestDescriptor) -> String {
    hex::encode(Sha256::digest(descriptor.canonical().as_bytes()))
}

/// Derives the cache key for a request within a namespace.
///
/// Same descriptor gives the same key across restarts. The fingerprint has a
/// fixed length, which keeps file-backed entries within filename limits.
pub fn derive_key(namespace: &Namespace, descriptor: &RequestDescriptor) -> CacheKey {
    CacheKey(format!(
        "{}{}{}",
        namespace,
        KEY_SEPARATOR,
        fingerprint(descriptor)
    ))
}
