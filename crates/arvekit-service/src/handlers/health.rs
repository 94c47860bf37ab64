//! Health check handler.

use axum::Json;

/// Liveness probe. Public, unauthenticated.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "arvekit",
    }))
}
