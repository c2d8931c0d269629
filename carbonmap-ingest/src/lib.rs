//! carbonmap-ingest library - CO2 telemetry ingest service
//!
//! Write path: validate → latest-reading cache → durable insert, with
//! partial success when durability fails. Read paths: the cached last
//! reading (GET /data) and the enriched recent-readings projection
//! (GET /readings).

use axum::routing::get;
use axum::Router;
use carbonmap_common::config::CoordinatePolicy;
use carbonmap_common::DeviceMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod cache;
pub mod db;
pub mod ingest;
pub mod projector;
pub mod store;
pub mod validator;

use cache::LatestReading;
use ingest::IngestCoordinator;
use store::ReadingStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Volatile last-accepted-measurement slot (fast path)
    pub cache: Arc<LatestReading>,
    /// Durable store adapter (system of record for /readings)
    pub store: Arc<dyn ReadingStore>,
    /// Write-path coordinator
    pub ingest: Arc<IngestCoordinator>,
    /// Static device → coordinate table, immutable for process lifetime
    pub devices: Arc<DeviceMap>,
    /// Projection policy for devices with no coordinate entry
    pub coordinate_policy: CoordinatePolicy,
}

impl AppState {
    /// Create application state around an injected store and device table
    pub fn new(
        store: Arc<dyn ReadingStore>,
        devices: Arc<DeviceMap>,
        coordinate_policy: CoordinatePolicy,
    ) -> Self {
        let cache = Arc::new(LatestReading::new());
        let ingest = Arc::new(IngestCoordinator::new(
            Arc::clone(&cache),
            Arc::clone(&store),
        ));
        Self {
            cache,
            store,
            ingest,
            devices,
            coordinate_policy,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::health::root))
        .route("/health", get(api::health::health_check))
        .route("/data", get(api::data::get_data).post(api::data::post_data))
        .route("/readings", get(api::readings::get_readings))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
