//! Configuration resolution
//!
//! Every setting resolves through the same priority order:
//! 1. Command-line argument (highest priority; env fallback handled by clap)
//! 2. TOML config file
//! 3. Compiled default
//!
//! An unusable database path does not prevent startup; the service degrades
//! to an unavailable store and fails persistence at request time instead.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Read-side policy for readings whose device has no coordinate entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatePolicy {
    /// Omit unmapped readings from the projection entirely
    #[default]
    Drop,
    /// Keep unmapped readings with null lat/lng
    PassThroughWithNulls,
}

impl FromStr for CoordinatePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(CoordinatePolicy::Drop),
            "nulls" | "pass-through" => Ok(CoordinatePolicy::PassThroughWithNulls),
            other => Err(Error::Config(format!(
                "Unknown coordinate policy '{}' (expected 'drop' or 'nulls')",
                other
            ))),
        }
    }
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port
    pub port: u16,
    /// SQLite database file path
    pub database: PathBuf,
    /// Optional device coordinate table (TOML); builtin table when absent
    pub devices_file: Option<PathBuf>,
    /// Projection policy for unmapped devices
    pub coordinate_policy: CoordinatePolicy,
}

impl ServiceConfig {
    /// Resolve configuration from CLI overrides, config file, and defaults
    pub fn resolve(
        port: Option<u16>,
        database: Option<PathBuf>,
        devices_file: Option<PathBuf>,
        coordinate_policy: Option<CoordinatePolicy>,
    ) -> Result<Self> {
        let file = load_config_values();

        let port = port
            .or_else(|| file_u16(&file, "port"))
            .unwrap_or(DEFAULT_PORT);

        let database = database
            .or_else(|| file_path(&file, "database"))
            .unwrap_or_else(default_database_path);

        let devices_file = devices_file.or_else(|| file_path(&file, "devices"));

        let coordinate_policy = match coordinate_policy {
            Some(p) => p,
            None => match file_str(&file, "coordinate_policy") {
                Some(s) => s.parse()?,
                None => CoordinatePolicy::default(),
            },
        };

        Ok(Self {
            port,
            database,
            devices_file,
            coordinate_policy,
        })
    }
}

/// Load the TOML config file if one exists, yielding its top-level table
fn load_config_values() -> Option<toml::Value> {
    let path = find_config_file()?;
    let text = std::fs::read_to_string(&path).ok()?;
    toml::from_str::<toml::Value>(&text).ok()
}

/// Locate the config file: ~/.config/carbonmap/config.toml first, then
/// /etc/carbonmap/config.toml on Linux
fn find_config_file() -> Option<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("carbonmap").join("config.toml"))
    {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/carbonmap/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

fn file_str(file: &Option<toml::Value>, key: &str) -> Option<String> {
    file.as_ref()?
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn file_u16(file: &Option<toml::Value>, key: &str) -> Option<u16> {
    file.as_ref()?
        .get(key)
        .and_then(|v| v.as_integer())
        .and_then(|n| u16::try_from(n).ok())
}

fn file_path(file: &Option<toml::Value>, key: &str) -> Option<PathBuf> {
    file_str(file, key).map(PathBuf::from)
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("carbonmap"))
        .unwrap_or_else(|| PathBuf::from("./carbonmap_data"))
        .join("readings.db")
}
