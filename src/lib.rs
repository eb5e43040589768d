//! # TMDB Proxy
//!
//! A read-through caching proxy for the TMDB movie metadata API, built with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Request identity, cache records and the upstream contract
//! - **Application Layer** ([`application`]) - Cache-aside logic and TMDB operations
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis / file cache backends and the TMDB client
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Cache-aside lookups with TTL expiry and deterministic SHA-256 keys
//! - Redis backend with server-side expiry, or a file backend with lazy expiry
//! - Fail-open caching: backend failures fall through to the upstream
//! - Upstream failures are never cached
//!
//! ## Quick Start
//!
//! ```bash
//! export TMDB_KEY="your-tmdb-api-key"
//! export REDIS_HOST="localhost"  # Optional, file cache otherwise
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;
