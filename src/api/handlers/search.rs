//! Handler for movie search.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde_json::Value;

use crate::api::dto::search::SearchParams;
use crate::error::AppError;
use crate::state::AppState;

/// Proxies a TMDB movie search through the cache.
///
/// # Endpoint
///
/// `GET /api/search?q=<query>&lang=<locale>&page=<n>`
///
/// # Query Parameters
///
/// - `q` (required): Search text (`query` is accepted as an alias)
/// - `lang` (optional): Locale (default: `en-US`)
/// - `page` (optional): Result page (default: 1)
///
/// # Errors
///
/// Returns 400 Bad Request if `q` is missing or `page` is not a positive integer.
/// Returns 502 Bad Gateway if the upstream call fails on a cache miss.
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(params) = params.map_err(|e| AppError::bad_request(e.body_text()))?;

    let query = params
        .search_text()
        .ok_or_else(|| AppError::bad_request("query param q is required"))?;

    if params.page == Some(0) {
        return Err(AppError::bad_request("query param page must be at least 1"));
    }

    let data = state
        .tmdb_service
        .search(query, params.lang.as_deref(), params.page)
        .await?;

    Ok(Json(data))
}
