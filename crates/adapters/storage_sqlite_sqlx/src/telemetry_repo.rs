//! `SQLite` implementation of [`TelemetryRepository`].
//!
//! Records are append-only. The decoded payload is stored as JSON text in
//! the `data` column; insertion order doubles as reporting order.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use hearth_app::ports::TelemetryRepository;
use hearth_domain::error::HearthError;
use hearth_domain::id::{DeviceId, HomeId};
use hearth_domain::telemetry::{TelemetryMap, TelemetryRecord};
use hearth_domain::time;

use crate::error::StorageError;

struct Wrapper(TelemetryRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device_id: String = row.try_get("device_id")?;
        let home_id: Option<i64> = row.try_get("home_id")?;
        let data_json: String = row.try_get("data")?;

        let data: TelemetryMap = serde_json::from_str(&data_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(TelemetryRecord {
            device_id: DeviceId::new(device_id),
            home_id: home_id.map(HomeId::new),
            data,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO device_data (device_id, home_id, data, created_at)
    VALUES (?, ?, ?, ?)
";

const SELECT_BY_DEVICE: &str = "SELECT * FROM device_data WHERE device_id = ? ORDER BY id";

/// `SQLite`-backed telemetry repository.
pub struct SqliteTelemetryRepository {
    pool: SqlitePool,
}

impl SqliteTelemetryRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TelemetryRepository for SqliteTelemetryRepository {
    async fn append(&self, record: &TelemetryRecord) -> Result<(), HearthError> {
        let data_json = serde_json::to_string(&record.data).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(record.device_id.as_str())
            .bind(record.home_id.map(HomeId::as_i64))
            .bind(&data_json)
            .bind(time::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn find_by_device(
        &self,
        device_id: &DeviceId,
    ) -> Result<Vec<TelemetryRecord>, HearthError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_DEVICE)
            .bind(device_id.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
