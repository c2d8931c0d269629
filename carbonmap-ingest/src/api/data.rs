//! Measurement ingest and last-reading endpoints

use crate::ingest::IngestOutcome;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use carbonmap_common::Measurement;
use serde::Serialize;
use serde_json::{json, Value};

/// Full-success ingest response
#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub status: String,
    pub saved: Measurement,
    pub db_id: i64,
}

/// GET /data - last accepted measurement (fast path, cache only)
pub async fn get_data(State(state): State<AppState>) -> Response {
    match state.cache.get().await {
        Some(measurement) => Json(measurement).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No data received yet" })),
        )
            .into_response(),
    }
}

/// POST /data - ingest one raw sensor payload.
///
/// 201 on full success, 400 on validation failure, 500 when the value was
/// accepted into memory but the durable write failed. The partial-success
/// body is distinguishable from both.
pub async fn post_data(State(state): State<AppState>, Json(raw): Json<Value>) -> Response {
    match state.ingest.ingest(&raw).await {
        IngestOutcome::Persisted {
            measurement,
            record_id,
        } => (
            StatusCode::CREATED,
            Json(SavedResponse {
                status: "ok".to_string(),
                saved: measurement,
                db_id: record_id,
            }),
        )
            .into_response(),

        IngestOutcome::AcceptedNotPersisted { store_error, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "Stored in RAM but failed to write to DB",
                "store_error": store_error.to_string(),
            })),
        )
            .into_response(),

        IngestOutcome::Rejected(reason) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": reason.to_string() })),
        )
            .into_response(),
    }
}
