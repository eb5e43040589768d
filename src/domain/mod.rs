//! Domain layer: request identity, cached records and the upstream contract.
//!
//! Nothing here depends on a concrete cache backend or HTTP client.
//!
//! # Architecture
//!
//! - [`request`] - [`request::RequestDescriptor`], the content-affecting identity of a request
//! - [`entry`] - [`entry::CacheEntry`], the stored `{stored_at, value}` record
//! - [`upstream`] - [`upstream::UpstreamClient`] trait implemented by infrastructure
//!
//! # Request Flow
//!
//! 1. A handler asks [`crate::application::services::TmdbService`] for a resource
//! 2. The service builds a [`request::RequestDescriptor`]
//! 3. [`crate::application::services::CacheAside`] derives a key and checks the backend
//! 4. On a miss the [`upstream::UpstreamClient`] is called and the result stored

pub mod entry;
pub mod request;
pub mod upstream;

pub use entry::CacheEntry;
pub use request::RequestDescriptor;
pub use upstream::{UpstreamClient, UpstreamError};
