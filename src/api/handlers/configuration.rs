//! Handler for the TMDB configuration document.

use axum::{Json, extract::State};
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

/// Proxies `GET /configuration` (image base URLs and sizes) through the cache.
///
/// # Endpoint
///
/// `GET /api/configuration`
pub async fn configuration_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.tmdb_service.configuration().await?))
}
