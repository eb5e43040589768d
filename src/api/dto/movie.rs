//! Query parameters for movie details.

use serde::Deserialize;

/// `GET /api/movie/{id}` query string.
#[derive(Debug, Default, Deserialize)]
pub struct MovieParams {
    /// Comma-separated sub-resources, e.g. `videos,credits`.
    #[serde(default)]
    pub append_to_response: Option<String>,

    #[serde(default)]
    pub lang: Option<String>,
}
