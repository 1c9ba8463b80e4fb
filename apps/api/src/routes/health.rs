use axum::Json;
use serde_json::{json, Value};

const SERVICE_NAME: &str = "resume-analyzer";

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Résumé analysis API",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME
    }))
}
