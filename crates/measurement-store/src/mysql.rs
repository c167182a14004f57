//! Measurement cache backed by MySQL.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{mysql::MySqlPoolOptions, FromRow, MySqlPool};
use tracing::debug;

use erddap_protocol::MeasurementKind;

use crate::cell::CellKey;
use crate::error::{StoreError, StoreResult};
use crate::store::{CachedMeasurement, MeasurementStore, StoredPoint};

/// Database connection pool and measurement cache operations.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Create a new store connection from a database URL.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        // Split SQL statements and execute them individually
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| StoreError::Query(format!("Migration failed: {}", e)))?;
            }
        }

        Ok(())
    }
}

fn measurement_table(kind: MeasurementKind) -> &'static str {
    match kind {
        MeasurementKind::Temperature => "temperature",
        MeasurementKind::Salinity => "salinity",
    }
}

#[async_trait]
impl MeasurementStore for MySqlStore {
    async fn find_exact(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
    ) -> StoreResult<Option<CachedMeasurement>> {
        // Coordinates were quantized through CellKey, so they bind to the
        // exact DOUBLE values the matching write produced.
        let sql = format!(
            "SELECT p.latitude, p.longitude, p.measured_on, m.value \
             FROM measurement_point p \
             INNER JOIN {} m ON m.point_id = p.id \
             WHERE p.latitude = ? AND p.longitude = ? AND p.measured_on = ? \
             LIMIT 1",
            measurement_table(kind)
        );

        let row = sqlx::query_as::<_, MeasurementRow>(&sql)
            .bind(key.latitude())
            .bind(key.longitude())
            .bind(key.date())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("Exact lookup failed: {}", e)))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_latest(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
    ) -> StoreResult<Option<CachedMeasurement>> {
        let sql = format!(
            "SELECT p.latitude, p.longitude, p.measured_on, m.value \
             FROM measurement_point p \
             INNER JOIN {} m ON m.point_id = p.id \
             WHERE p.latitude = ? AND p.longitude = ? \
             ORDER BY p.measured_on DESC \
             LIMIT 1",
            measurement_table(kind)
        );

        let row = sqlx::query_as::<_, MeasurementRow>(&sql)
            .bind(key.latitude())
            .bind(key.longitude())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("Latest lookup failed: {}", e)))?;

        Ok(row.map(|r| r.into()))
    }

    async fn upsert(
        &self,
        key: &CellKey,
        kind: MeasurementKind,
        value: Option<f64>,
    ) -> StoreResult<u64> {
        // LAST_INSERT_ID(id) makes last_insert_id() return the existing
        // row's id when the cell is already present.
        let result = sqlx::query(
            "INSERT INTO measurement_point (latitude, longitude, measured_on) \
             VALUES (?, ?, ?) \
             ON DUPLICATE KEY UPDATE id = LAST_INSERT_ID(id)",
        )
        .bind(key.latitude())
        .bind(key.longitude())
        .bind(key.date())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Write(format!("Point upsert failed: {}", e)))?;

        let point_id = result.last_insert_id();

        let sql = match kind {
            MeasurementKind::Temperature => {
                "INSERT INTO temperature (point_id, value) VALUES (?, ?) \
                 ON DUPLICATE KEY UPDATE value = VALUES(value)"
            }
            MeasurementKind::Salinity => {
                "INSERT INTO salinity (point_id, value, differential) VALUES (?, ?, NULL) \
                 ON DUPLICATE KEY UPDATE value = VALUES(value)"
            }
        };

        sqlx::query(sql)
            .bind(point_id)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Write(format!("Measurement upsert failed: {}", e)))?;

        debug!(cell = %key, kind = %kind, point_id, "Recorded measurement");

        Ok(point_id)
    }

    async fn all_points(&self) -> StoreResult<Vec<StoredPoint>> {
        let rows = sqlx::query_as::<_, PointRow>(
            "SELECT p.id, p.latitude, p.longitude, p.measured_on, \
             t.value AS temperature, s.value AS salinity \
             FROM measurement_point p \
             LEFT JOIN temperature t ON t.point_id = p.id \
             LEFT JOIN salinity s ON s.point_id = p.id \
             ORDER BY p.measured_on DESC, p.latitude ASC, p.longitude ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(format!("Point listing failed: {}", e)))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

/// Internal row type for measurement lookups.
#[derive(FromRow)]
struct MeasurementRow {
    latitude: f64,
    longitude: f64,
    measured_on: NaiveDate,
    value: Option<f64>,
}

impl From<MeasurementRow> for CachedMeasurement {
    fn from(row: MeasurementRow) -> Self {
        CachedMeasurement {
            value: row.value,
            latitude: row.latitude,
            longitude: row.longitude,
            measured_on: row.measured_on,
        }
    }
}

/// Internal row type for point listings.
#[derive(FromRow)]
struct PointRow {
    id: u64,
    latitude: f64,
    longitude: f64,
    measured_on: NaiveDate,
    temperature: Option<f64>,
    salinity: Option<f64>,
}

impl From<PointRow> for StoredPoint {
    fn from(row: PointRow) -> Self {
        StoredPoint {
            id: row.id,
            latitude: row.latitude,
            longitude: row.longitude,
            measured_on: row.measured_on,
            temperature: row.temperature,
            salinity: row.salinity,
        }
    }
}

/// Database schema SQL.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS measurement_point (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    latitude DOUBLE NOT NULL,
    longitude DOUBLE NOT NULL,
    measured_on DATE NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,

    UNIQUE KEY uq_point_cell (latitude, longitude, measured_on)
);

CREATE TABLE IF NOT EXISTS temperature (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    point_id BIGINT UNSIGNED NOT NULL,
    value DOUBLE NULL,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,

    UNIQUE KEY uq_temperature_point (point_id),
    CONSTRAINT fk_temperature_point FOREIGN KEY (point_id)
        REFERENCES measurement_point (id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS salinity (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    point_id BIGINT UNSIGNED NOT NULL,
    value DOUBLE NULL,
    differential DOUBLE NULL,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,

    UNIQUE KEY uq_salinity_point (point_id),
    CONSTRAINT fk_salinity_point FOREIGN KEY (point_id)
        REFERENCES measurement_point (id) ON DELETE CASCADE
);
"#;
