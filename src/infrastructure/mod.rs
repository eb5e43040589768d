//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for caching and upstream access.
//!
//! # Modules
//!
//! - [`cache`] - Cache backends (Redis and local file) and key derivation
//! - [`tmdb`] - HTTP client for the TMDB API

pub mod cache;
pub mod tmdb;
