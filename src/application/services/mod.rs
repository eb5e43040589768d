//! Business logic services for the application layer.

pub mod cache_aside;
pub mod tmdb_service;

pub use cache_aside::CacheAside;
pub use tmdb_service::TmdbService;
