//! Handler for movie details.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;

use crate::api::dto::movie::MovieParams;
use crate::application::services::tmdb_service::is_valid_movie_id;
use crate::error::AppError;
use crate::state::AppState;

/// Proxies a TMDB movie detail lookup through the cache.
///
/// # Endpoint
///
/// `GET /api/movie/{id}?append_to_response=<csv>&lang=<locale>`
///
/// # Errors
///
/// - 400 Bad Request for an id that is only dots
/// - 502 Bad Gateway if the upstream call fails on a cache miss,
///   including an unknown id (TMDB answers 404)
pub async fn movie_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<MovieParams>,
) -> Result<Json<Value>, AppError> {
    if !is_valid_movie_id(&id) {
        return Err(AppError::bad_request("invalid movie id"));
    }

    let data = state
        .tmdb_service
        .movie(
            &id,
            params.append_to_response.as_deref(),
            params.lang.as_deref(),
        )
        .await?;

    Ok(Json(data))
}
