//! Health Route
//! Mission: Liveness probe for orchestration

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe, open to anonymous callers
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
