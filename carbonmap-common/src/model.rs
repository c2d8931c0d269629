//! Canonical measurement model and read-side projection types
//!
//! One schema version is deployed per instance. `Measurement` is the
//! normalized record accepted after validation; raw wire payloads exist only
//! as `serde_json::Value` during validation and are never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized sensor measurement, as cached and persisted.
///
/// Invariants (enforced by the validator, relied on everywhere else):
/// - `device_id` is non-empty after trimming
/// - all numeric fields are finite
/// - present optional strings are non-empty after trimming
/// - `received_at` is server-assigned at acceptance; client-supplied
///   timestamps are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Reporting device identifier (natural key from the device)
    pub device_id: String,

    /// CO2 concentration in parts per million
    pub co2_ppm: f64,

    /// Estimated emission rate, reported by mobile-asset firmware only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_emission_kg_per_hr: Option<f64>,

    /// Asset class the sensor is mounted on (e.g. "truck", "building")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,

    /// Human-readable asset label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,

    /// Server clock at acceptance
    pub received_at: DateTime<Utc>,
}

/// A measurement as read back from the durable store.
///
/// `id` is the store-assigned insertion key and the only trusted recency
/// ordering; `received_at` is display data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredReading {
    pub id: i64,
    pub device_id: String,
    pub co2_ppm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_emission_kg_per_hr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// A stored reading joined with static device coordinates for presentation.
///
/// Constructed per read request, never stored. Coordinates are optional so
/// the pass-through-with-nulls projection policy can serialize `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedReading {
    pub id: i64,
    pub device_id: String,
    pub co2_ppm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_emission_kg_per_hr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    pub received_at: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Measurement {
        Measurement {
            device_id: "Granville St".to_string(),
            co2_ppm: 812.0,
            co2_emission_kg_per_hr: None,
            asset_type: None,
            asset_name: None,
            received_at: Utc::now(),
        }
    }

    #[test]
    fn measurement_serializes_without_absent_optionals() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["device_id"], "Granville St");
        assert_eq!(json["co2_ppm"], 812.0);
        assert!(json.get("co2_emission_kg_per_hr").is_none());
        assert!(json.get("asset_type").is_none());
        assert!(json.get("asset_name").is_none());
        assert!(json["received_at"].is_string());
    }

    #[test]
    fn measurement_round_trips_through_json() {
        let m = Measurement {
            co2_emission_kg_per_hr: Some(1.25),
            asset_type: Some("truck".to_string()),
            asset_name: Some("Fleet 12".to_string()),
            ..sample()
        };
        let json = serde_json::to_string(&m).unwrap();
        let back: Measurement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
