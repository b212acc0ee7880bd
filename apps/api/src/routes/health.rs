use axum::Json;
use serde_json::{json, Value};

/// GET /api/healthcheck
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Asha API",
        "healthcheck": "/api/healthcheck",
    }))
}
