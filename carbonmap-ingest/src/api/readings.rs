//! Enriched recent-readings endpoint

use crate::projector::project;
use crate::store::DEFAULT_RECENT_LIMIT;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

/// Upper bound on a single recent-readings projection
const MAX_RECENT_LIMIT: u32 = 5000;

/// Query parameters for GET /readings
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    /// Maximum rows to return (newest first)
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_RECENT_LIMIT
}

/// GET /readings?limit=N
///
/// Serves the enriched projection from the durable store; the cache is not
/// consulted. All-or-nothing: a store failure answers 500 with no partial
/// list.
pub async fn get_readings(
    State(state): State<AppState>,
    Query(query): Query<ReadingsQuery>,
) -> Response {
    let limit = query.limit.min(MAX_RECENT_LIMIT);

    match state.store.recent(limit).await {
        Ok(records) => {
            let enriched = project(records, &state.devices, state.coordinate_policy);
            Json(enriched).into_response()
        }
        Err(e) => {
            error!("Recent-readings query failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch readings" })),
            )
                .into_response()
        }
    }
}
