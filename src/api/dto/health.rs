//! DTO for the liveness endpoint.

use serde::Serialize;

/// Liveness response. Always `{"ok": true}`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}
