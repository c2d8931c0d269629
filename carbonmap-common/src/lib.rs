//! # Carbonmap Common Library
//!
//! Shared code for the carbonmap backend:
//! - Canonical measurement model and read-side projection types
//! - Static device → geocoordinate table
//! - Configuration resolution
//! - Common error types

pub mod config;
pub mod devices;
pub mod error;
pub mod model;

pub use devices::{DeviceMap, GeoPoint};
pub use error::{Error, Result};
pub use model::{EnrichedReading, Measurement, StoredReading};
