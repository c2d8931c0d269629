//! Read-side enrichment projection
//!
//! Joins stored readings with the static device coordinate table for
//! presentation. Pure: the input ordering (newest-first from the store) is
//! preserved and a missing device entry is never an error. The configured
//! `CoordinatePolicy` applies uniformly to the whole projection, so mixing
//! per-record behavior is impossible by construction.

use carbonmap_common::config::CoordinatePolicy;
use carbonmap_common::{DeviceMap, EnrichedReading, StoredReading};

/// Project stored readings into the externally-visible enriched view
pub fn project(
    records: Vec<StoredReading>,
    devices: &DeviceMap,
    policy: CoordinatePolicy,
) -> Vec<EnrichedReading> {
    records
        .into_iter()
        .filter_map(|record| {
            let coords = devices.lookup(&record.device_id);
            match (coords, policy) {
                (None, CoordinatePolicy::Drop) => None,
                (coords, _) => Some(EnrichedReading {
                    id: record.id,
                    device_id: record.device_id,
                    co2_ppm: record.co2_ppm,
                    co2_emission_kg_per_hr: record.co2_emission_kg_per_hr,
                    asset_type: record.asset_type,
                    asset_name: record.asset_name,
                    received_at: record.received_at,
                    lat: coords.map(|c| c.lat),
                    lng: coords.map(|c| c.lng),
                }),
            }
        })
        .collect()
}
