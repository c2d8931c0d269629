//! Database connection and schema bootstrap

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Open (creating if necessary) the readings database at `path`
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
    }

    // mode=rwc: create the database file on first run
    let db_url = format!("sqlite://{}?mode=rwc", path.display());

    let pool = SqlitePool::connect(&db_url)
        .await
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    init_schema(&pool).await.context("Failed to initialize database schema")?;

    Ok(pool)
}

/// Create the readings table if it does not exist. Idempotent.
pub async fn init_schema(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS readings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            device_id TEXT NOT NULL,
            co2_ppm REAL NOT NULL,
            co2_emission_kg_per_hr REAL,
            asset_type TEXT,
            asset_name TEXT,
            received_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        init_schema(&pool).await.unwrap();
        init_schema(&pool).await.unwrap();

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='readings')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(exists);
    }

    #[tokio::test]
    async fn connect_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("readings.db");

        let pool = connect(&path).await.unwrap();
        drop(pool);

        assert!(path.exists());
    }
}
