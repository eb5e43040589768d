//! Query parameters for movie search.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

/// `GET /api/search` query string.
///
/// `q` is the documented parameter; `query` is accepted as an alias.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,

    #[serde(default)]
    pub query: Option<String>,

    #[serde(default)]
    pub lang: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,
}

impl SearchParams {
    /// Search text from `q` or `query`, ignoring blank values.
    pub fn search_text(&self) -> Option<&str> {
        [self.q.as_deref(), self.query.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}
