//! Durable store adapter
//!
//! The store is the system of record for historical readings, reached
//! through the narrow `ReadingStore` trait so the concrete persistence
//! technology stays swappable without touching ingestion or projection
//! logic. It can fail independently of the fast-path cache; callers decide
//! what a failed insert means (see the ingest coordinator).

use async_trait::async_trait;
use carbonmap_common::{Measurement, StoredReading};
use thiserror::Error;

mod sqlite;
pub use sqlite::SqliteReadingStore;

/// Default number of rows served by a recent-readings query
pub const DEFAULT_RECENT_LIMIT: u32 = 500;

/// Infrastructure-side store failure, surfaced to callers as HTTP 500
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Durable store unavailable: {0}")]
    Unavailable(String),
}

/// Append/query interface to the durable store.
///
/// `insert` assigns a monotonically increasing record id; `recent` returns
/// up to `limit` rows ordered newest-first by that id (insertion order, not
/// any client-supplied timestamp). No retry happens at this layer.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn insert(&self, measurement: &Measurement) -> Result<i64, StoreError>;

    async fn recent(&self, limit: u32) -> Result<Vec<StoredReading>, StoreError>;
}

/// Stand-in store used when the database could not be opened at startup.
///
/// Startup proceeds without durability; every call fails at request time
/// with `StoreError::Unavailable`, so ingests degrade to partial success and
/// list reads answer 500.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ReadingStore for UnavailableStore {
    async fn insert(&self, _measurement: &Measurement) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }

    async fn recent(&self, _limit: u32) -> Result<Vec<StoredReading>, StoreError> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}
