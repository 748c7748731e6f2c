use axum::Json;
use serde_json::{json, Value};

/// GET /api/health — liveness only; never calls FMS.
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
