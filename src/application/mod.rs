//! Application layer services implementing the proxy's use cases.
//!
//! Services sit between HTTP handlers and infrastructure: handlers call a
//! service operation, the service builds the request identity and decides
//! whether the cache or the upstream answers it.
//!
//! # Available Services
//!
//! - [`services::cache_aside::CacheAside`] - Cache-aside lookups over the selected backend
//! - [`services::tmdb_service::TmdbService`] - Search, movie and configuration lookups

pub mod services;
