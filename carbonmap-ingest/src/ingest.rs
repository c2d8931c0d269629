//! Ingest coordination
//!
//! Orchestrates the write path: validate → update cache → durable insert.
//! The central failure-handling decision lives here: a valid measurement is
//! accepted into the volatile fast path unconditionally, and a durable-store
//! failure afterwards produces a partial-success outcome distinguishable
//! from full success rather than dropping the acceptance silently.

use crate::cache::LatestReading;
use crate::store::{ReadingStore, StoreError};
use crate::validator::{validate, ValidationError};
use carbonmap_common::Measurement;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Result of an ingest attempt, three-way by design
#[derive(Debug)]
pub enum IngestOutcome {
    /// Payload failed validation; no cache update, no store write attempted
    Rejected(ValidationError),

    /// Cache holds the measurement but the durable insert failed
    AcceptedNotPersisted {
        measurement: Measurement,
        store_error: StoreError,
    },

    /// Cache updated and durably persisted under `record_id`
    Persisted {
        measurement: Measurement,
        record_id: i64,
    },
}

/// Coordinates the validate → cache → store write path
pub struct IngestCoordinator {
    cache: Arc<LatestReading>,
    store: Arc<dyn ReadingStore>,
}

impl IngestCoordinator {
    pub fn new(cache: Arc<LatestReading>, store: Arc<dyn ReadingStore>) -> Self {
        Self { cache, store }
    }

    /// Ingest one raw payload.
    ///
    /// The cache update completes before the store insert is issued, so the
    /// fast path reflects the most recent valid input regardless of what
    /// happens to durable persistence.
    pub async fn ingest(&self, raw: &Value) -> IngestOutcome {
        let measurement = match validate(raw, Utc::now()) {
            Ok(m) => m,
            Err(e) => return IngestOutcome::Rejected(e),
        };

        info!(
            device_id = %measurement.device_id,
            co2_ppm = measurement.co2_ppm,
            "New measurement received"
        );

        self.cache.set(measurement.clone()).await;

        match self.store.insert(&measurement).await {
            Ok(record_id) => IngestOutcome::Persisted {
                measurement,
                record_id,
            },
            Err(e) => {
                error!("Durable insert failed: {}", e);
                IngestOutcome::AcceptedNotPersisted {
                    measurement,
                    store_error: e,
                }
            }
        }
    }
}
