use std::sync::Arc;

use crate::application::services::TmdbService;

/// Shared handler state, built once in [`crate::server::run`].
#[derive(Clone)]
pub struct AppState {
    pub tmdb_service: Arc<TmdbService>,
}

impl AppState {
    pub fn new(tmdb_service: Arc<TmdbService>) -> Self {
        Self { tmdb_service }
    }
}
