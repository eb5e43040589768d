//! API route configuration.
//!
//! All API endpoints are public and read-only.

use crate::api::handlers::{configuration_handler, movie_handler, search_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `GET /search`         - Movie search (`q`, `lang`, `page`)
/// - `GET /movie/{id}`     - Movie details (`append_to_response`, `lang`)
/// - `GET /configuration`  - TMDB configuration document
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_handler))
        .route("/movie/{id}", get(movie_handler))
        .route("/configuration", get(configuration_handler))
}
