//! TMDB upstream integration.

mod client;

pub use client::{DEFAULT_BASE_URL, TmdbClient};
