//! Payload schema validation
//!
//! Pure validation of raw wire payloads against the deployed measurement
//! schema. No I/O, no side effects, no partial coercion: a numeric string is
//! not a number, a missing required field is not defaulted, and the first
//! violation terminates validation. The caller injects the acceptance
//! timestamp so this stays deterministic under test.
//!
//! Unknown keys are ignored; device firmware generations disagree about
//! extra fields and the canonical schema only claims the ones below.

use carbonmap_common::Measurement;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

/// Why a payload was rejected. `Display` output is the HTTP 400 body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid payload format: expected a JSON object")]
    NotAnObject,

    #[error("Invalid payload format: missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid payload format: field '{0}' must be a string")]
    NotAString(&'static str),

    #[error("Invalid payload format: field '{0}' must be a number")]
    NotANumber(&'static str),

    #[error("Invalid payload format: field '{0}' must be a finite number")]
    NotFinite(&'static str),

    #[error("Invalid payload format: field '{0}' must not be empty")]
    EmptyString(&'static str),
}

/// Validate a raw payload into a canonical measurement.
///
/// Required: `device_id` (non-empty string), `co2_ppm` (finite number).
/// Optional: `co2_emission_kg_per_hr` (finite number), `asset_type` and
/// `asset_name` (non-empty strings). Explicit `null` on an optional field is
/// treated as absent; on a required field it is a type error.
pub fn validate(raw: &Value, received_at: DateTime<Utc>) -> Result<Measurement, ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    let device_id = required_string(obj, "device_id")?;
    let co2_ppm = required_number(obj, "co2_ppm")?;
    let co2_emission_kg_per_hr = optional_number(obj, "co2_emission_kg_per_hr")?;
    let asset_type = optional_string(obj, "asset_type")?;
    let asset_name = optional_string(obj, "asset_name")?;

    Ok(Measurement {
        device_id,
        co2_ppm,
        co2_emission_kg_per_hr,
        asset_type,
        asset_name,
        received_at,
    })
}

fn required_string(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<String, ValidationError> {
    let value = obj.get(key).ok_or(ValidationError::MissingField(key))?;
    let s = value.as_str().ok_or(ValidationError::NotAString(key))?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyString(key));
    }
    Ok(trimmed.to_string())
}

fn required_number(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<f64, ValidationError> {
    let value = obj.get(key).ok_or(ValidationError::MissingField(key))?;
    finite(value, key)
}

fn optional_string(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let s = value.as_str().ok_or(ValidationError::NotAString(key))?;
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::EmptyString(key));
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn optional_number(
    obj: &serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<Option<f64>, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => finite(value, key).map(Some),
    }
}

fn finite(value: &Value, key: &'static str) -> Result<f64, ValidationError> {
    // as_f64 is None for strings, booleans, arrays, objects, and null;
    // numeric strings are NOT coerced
    let n = value.as_f64().ok_or(ValidationError::NotANumber(key))?;
    if !n.is_finite() {
        return Err(ValidationError::NotFinite(key));
    }
    Ok(n)
}
