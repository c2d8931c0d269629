//! Health endpoints

use axum::Json;
use serde::Serialize;

/// Root health response, consumed by the map client's connectivity check
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: String,
    pub message: String,
}

/// Module health response for monitoring
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok".to_string(),
        message: "Carbon backend running".to_string(),
    })
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "carbonmap-ingest".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
