//! SQLite-backed reading store

use async_trait::async_trait;
use carbonmap_common::{Measurement, StoredReading};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use super::{ReadingStore, StoreError};

/// Durable reading store on a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqliteReadingStore {
    pool: SqlitePool,
}

impl SqliteReadingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for SqliteReadingStore {
    async fn insert(&self, measurement: &Measurement) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO readings (
                device_id,
                co2_ppm,
                co2_emission_kg_per_hr,
                asset_type,
                asset_name,
                received_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&measurement.device_id)
        .bind(measurement.co2_ppm)
        .bind(measurement.co2_emission_kg_per_hr)
        .bind(&measurement.asset_type)
        .bind(&measurement.asset_name)
        .bind(measurement.received_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<StoredReading>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, device_id, co2_ppm, co2_emission_kg_per_hr,
                   asset_type, asset_name, received_at
            FROM readings
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(read_row).collect()
    }
}

/// Map a row into a `StoredReading`, coercing stored values defensively.
///
/// Identifying fields (`id`, `device_id`) and the core metric must decode or
/// the row is an error; optional fields fail soft to `None`.
fn read_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredReading, StoreError> {
    let id: i64 = row.try_get("id")?;
    let device_id: String = row.try_get("device_id")?;

    // An INTEGER-affinity value is still a valid metric
    let co2_ppm: f64 = match row.try_get::<f64, _>("co2_ppm") {
        Ok(v) => v,
        Err(_) => row.try_get::<i64, _>("co2_ppm")? as f64,
    };

    let co2_emission_kg_per_hr = row
        .try_get::<Option<f64>, _>("co2_emission_kg_per_hr")
        .ok()
        .flatten();
    let asset_type = row.try_get::<Option<String>, _>("asset_type").ok().flatten();
    let asset_name = row.try_get::<Option<String>, _>("asset_name").ok().flatten();

    let received_at: DateTime<Utc> = row.try_get("received_at")?;

    Ok(StoredReading {
        id,
        device_id,
        co2_ppm,
        co2_emission_kg_per_hr,
        asset_type,
        asset_name,
        received_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_store() -> SqliteReadingStore {
        // One connection: each pooled connection would otherwise get its
        // own private in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        SqliteReadingStore::new(pool)
    }

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
    async fn insert_assigns_increasing_ids() {
        let store = setup_store().await;

        let first = store.insert(&reading("sensor-1", 400.0)).await.unwrap();
        let second = store.insert(&reading("sensor-2", 500.0)).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn recent_orders_newest_first() {
        let store = setup_store().await;
        for i in 0..5 {
            store
                .insert(&reading(&format!("sensor-{i}"), f64::from(i)))
                .await
                .unwrap();
        }

        let rows = store.recent(10).await.unwrap();
        assert_eq!(rows.len(), 5);
        for pair in rows.windows(2) {
            assert!(pair[0].id > pair[1].id);
        }
        assert_eq!(rows[0].device_id, "sensor-4");
    }

    #[tokio::test]
    async fn recent_honors_limit() {
        let store = setup_store().await;
        for i in 0..8 {
            store
                .insert(&reading(&format!("sensor-{i}"), 400.0))
                .await
                .unwrap();
        }

        let rows = store.recent(3).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].device_id, "sensor-7");
        assert_eq!(rows[2].device_id, "sensor-5");
    }

    #[tokio::test]
    async fn recent_on_empty_store_is_empty() {
        let store = setup_store().await;
        assert!(store.recent(500).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn round_trips_all_fields() {
        let store = setup_store().await;
        let m = Measurement {
            device_id: "truck-7".to_string(),
            co2_ppm: 455.5,
            co2_emission_kg_per_hr: Some(1.25),
            asset_type: Some("truck".to_string()),
            asset_name: Some("Fleet 12".to_string()),
            received_at: Utc::now(),
        };

        let id = store.insert(&m).await.unwrap();
        let rows = store.recent(1).await.unwrap();

        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].device_id, m.device_id);
        assert_eq!(rows[0].co2_ppm, m.co2_ppm);
        assert_eq!(rows[0].co2_emission_kg_per_hr, m.co2_emission_kg_per_hr);
        assert_eq!(rows[0].asset_type, m.asset_type);
        assert_eq!(rows[0].asset_name, m.asset_name);
    }

    #[tokio::test]
    async fn coerces_integer_affinity_metric() {
        let store = setup_store().await;

        // A raw row written by older tooling with INTEGER co2_ppm
        sqlx::query(
            "INSERT INTO readings (device_id, co2_ppm, received_at) VALUES (?, ?, ?)",
        )
        .bind("sensor-1")
        .bind(812i64)
        .bind(Utc::now())
        .execute(&store.pool)
        .await
        .unwrap();

        let rows = store.recent(1).await.unwrap();
        assert_eq!(rows[0].co2_ppm, 812.0);
        assert_eq!(rows[0].co2_emission_kg_per_hr, None);
    }
}
