//! Latest-reading cache
//!
//! Single-slot, process-wide holder of the most recently accepted
//! measurement. This is the volatile fast path behind GET /data, not a
//! source of truth: it is replaced wholesale on every accepted ingest and
//! has no ordering relationship with the durable store beyond "the slot is
//! written before the store insert is issued".

use carbonmap_common::Measurement;
use tokio::sync::RwLock;

/// Shared single-slot cache of the last accepted measurement
#[derive(Debug, Default)]
pub struct LatestReading {
    // Whole-value replacement only; readers always observe a fully-formed
    // measurement or none at all
    slot: RwLock<Option<Measurement>>,
}

impl LatestReading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot with a new measurement (last write wins)
    pub async fn set(&self, measurement: Measurement) {
        *self.slot.write().await = Some(measurement);
    }

    /// Current slot contents; `None` until the first accepted ingest
    pub async fn get(&self) -> Option<Measurement> {
        self.slot.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;

    fn reading(device_id: &str, co2_ppm: f64) -> Measurement {
        Measurement {
            device_id: device_id.to_string(),
            co2_ppm,
            co2_emission_kg_per_hr: None,
            asset_type: None,
            asset_name: None,
            received_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn empty_until_first_set() {
        let cache = LatestReading::new();
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn get_returns_exact_stored_value() {
        let cache = LatestReading::new();
        let m = reading("sensor-1", 812.0);
        cache.set(m.clone()).await;
        assert_eq!(cache.get().await, Some(m));
    }

    #[tokio::test]
    async fn set_replaces_never_merges() {
        let cache = LatestReading::new();
        let first = Measurement {
            asset_name: Some("Depot".to_string()),
            ..reading("sensor-1", 400.0)
        };
        cache.set(first).await;
        cache.set(reading("sensor-2", 500.0)).await;

        let current = cache.get().await.unwrap();
        assert_eq!(current.device_id, "sensor-2");
        // No field survives from the previous occupant
        assert_eq!(current.asset_name, None);
    }

    /// Concurrent writers interleave in whatever order the scheduler picks;
    /// the slot ends up holding exactly one of the written values, fully
    /// formed. "Most recent request processed" is not guaranteed to equal
    /// "most recent request received". This is accepted weak consistency,
    /// not a bug.
    #[tokio::test]
    async fn concurrent_writes_leave_one_complete_value() {
        let cache = Arc::new(LatestReading::new());

        let mut handles = Vec::new();
        for i in 0..32u32 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache.set(reading(&format!("sensor-{i}"), f64::from(i))).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let current = cache.get().await.unwrap();
        let suffix = current.device_id.strip_prefix("sensor-").unwrap();
        let i: u32 = suffix.parse().unwrap();
        assert!(i < 32);
        // Value fields belong to the same write, not a torn mix
        assert_eq!(current.co2_ppm, f64::from(i));
    }

    #[tokio::test]
    async fn reads_run_concurrently_with_writes() {
        let cache = Arc::new(LatestReading::new());
        cache.set(reading("sensor-1", 1.0)).await;

        let writer = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                for i in 0..100 {
                    cache.set(reading("sensor-1", f64::from(i))).await;
                }
            })
        };
        let reader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                for _ in 0..100 {
                    let m = cache.get().await.unwrap();
                    assert_eq!(m.device_id, "sensor-1");
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
    }
}
