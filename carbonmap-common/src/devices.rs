//! Static device → geocoordinate table
//!
//! Loaded once at process start and immutable afterwards. A device id with
//! no entry is an expected state (new or unmapped sensor), not an error; the
//! read-side projector decides what to do with unmapped readings.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Geographic position of a fixed sensor installation
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Immutable mapping from device id to installation coordinates
#[derive(Debug, Clone)]
pub struct DeviceMap {
    entries: HashMap<String, GeoPoint>,
}

/// TOML file shape:
///
/// ```toml
/// [devices."Granville St"]
/// lat = 49.2827
/// lng = -123.1187
/// ```
#[derive(Debug, Deserialize)]
struct DeviceFile {
    #[serde(default)]
    devices: HashMap<String, GeoPoint>,
}

impl DeviceMap {
    /// Look up coordinates for a device; `None` is a valid, expected result
    pub fn lookup(&self, device_id: &str) -> Option<GeoPoint> {
        self.entries.get(device_id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a device table from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: DeviceFile = toml::from_str(text)
            .map_err(|e| Error::Config(format!("Invalid device map: {}", e)))?;
        Ok(Self {
            entries: file.devices,
        })
    }

    /// Load a device table from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Compiled-in default table: the Vancouver street sensor deployment
    pub fn builtin() -> Self {
        let entries = [
            ("Granville St", 49.2827, -123.1187),
            ("Main St", 49.2734, -123.1000),
            ("Broadway", 49.2625, -123.1140),
            ("Kingsway", 49.2485, -123.0650),
            ("Fraser St", 49.2570, -123.0900),
            ("Commercial Dr", 49.2730, -123.0690),
            ("Hastings St", 49.2810, -123.0560),
            ("Robson St", 49.2835, -123.1210),
            ("Davie St", 49.2810, -123.1330),
            ("Denman St", 49.2900, -123.1390),
            ("West 4th Ave", 49.2680, -123.1550),
            ("West 41st Ave", 49.2330, -123.1160),
            ("Knight St", 49.2430, -123.0770),
            ("Cambie St", 49.2660, -123.1150),
            ("Victoria Dr", 49.2490, -123.0650),
        ]
        .into_iter()
        .map(|(id, lat, lng)| (id.to_string(), GeoPoint { lat, lng }))
        .collect();

        Self { entries }
    }
}
