//! carbonmap-ingest - CO2 telemetry ingest service
//!
//! Receives sensor payloads pushed by field devices, keeps the last accepted
//! reading in memory, persists readings in SQLite, and serves the enriched
//! recent-readings view consumed by the map client.

use anyhow::{Context, Result};
use carbonmap_common::config::{CoordinatePolicy, ServiceConfig};
use carbonmap_common::DeviceMap;
use carbonmap_ingest::store::{ReadingStore, SqliteReadingStore, UnavailableStore};
use carbonmap_ingest::{build_router, db, AppState};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "carbonmap-ingest", about = "CO2 telemetry ingest service")]
struct Args {
    /// HTTP listen port
    #[arg(long, env = "CARBONMAP_PORT")]
    port: Option<u16>,

    /// SQLite database file path
    #[arg(long, env = "CARBONMAP_DATABASE")]
    database: Option<PathBuf>,

    /// Device coordinate table (TOML); builtin table when omitted
    #[arg(long, env = "CARBONMAP_DEVICES")]
    devices: Option<PathBuf>,

    /// Policy for readings from unmapped devices: 'drop' or 'nulls'
    #[arg(long, env = "CARBONMAP_COORDINATE_POLICY")]
    coordinate_policy: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting carbonmap-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let coordinate_policy: Option<CoordinatePolicy> = args
        .coordinate_policy
        .as_deref()
        .map(str::parse)
        .transpose()?;

    let config = ServiceConfig::resolve(args.port, args.database, args.devices, coordinate_policy)?;

    // Static device table, loaded once and immutable afterwards
    let devices = match &config.devices_file {
        Some(path) => {
            let map = DeviceMap::load(path)
                .with_context(|| format!("Failed to load device map {}", path.display()))?;
            info!("Loaded {} device entries from {}", map.len(), path.display());
            map
        }
        None => {
            let map = DeviceMap::builtin();
            info!("Using builtin device table ({} entries)", map.len());
            map
        }
    };

    // An unusable database degrades persistence instead of preventing
    // startup; inserts and queries fail at request time
    let store: Arc<dyn ReadingStore> = match db::connect(&config.database).await {
        Ok(pool) => {
            info!("✓ Connected to database {}", config.database.display());
            Arc::new(SqliteReadingStore::new(pool))
        }
        Err(e) => {
            error!("Database unavailable, readings will not be persisted: {:#}", e);
            Arc::new(UnavailableStore::new(e.to_string()))
        }
    };

    let state = AppState::new(store, Arc::new(devices), config.coordinate_policy);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("carbonmap-ingest listening on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
