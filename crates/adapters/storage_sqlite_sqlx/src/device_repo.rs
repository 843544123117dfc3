//! `SQLite` implementation of [`DeviceRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use hearth_app::ports::DeviceRepository;
use hearth_domain::device::Device;
use hearth_domain::error::HearthError;
use hearth_domain::id::{ChannelId, DeviceId, HomeId, UserId};

use crate::error::StorageError;

struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device_id: String = row.try_get("device_id")?;
        let channel: String = row.try_get("channel")?;
        let production_date_str: String = row.try_get("production_date")?;
        let warranty: String = row.try_get("warranty")?;
        let location: String = row.try_get("location")?;
        let is_active: bool = row.try_get("is_active")?;
        let user_id: i64 = row.try_get("user_id")?;
        let home_id: Option<i64> = row.try_get("home_id")?;
        let created_at_str: String = row.try_get("created_at")?;

        let production_date = chrono::DateTime::parse_from_rfc3339(&production_date_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(Device {
            device_id: DeviceId::new(device_id),
            channel: ChannelId::new(channel),
            production_date,
            warranty,
            location,
            is_active,
            user_id: UserId::new(user_id),
            home_id: home_id.map(HomeId::new),
            created_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO devices (device_id, channel, production_date, warranty, location, is_active, user_id, home_id, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE: &str = r"
    UPDATE devices
    SET channel = ?, production_date = ?, warranty = ?, location = ?,
        is_active = ?, user_id = ?, home_id = ?, created_at = ?
    WHERE device_id = ?
";

const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE device_id = ?";
const SELECT_BY_CHANNEL: &str = "SELECT * FROM devices WHERE channel = ?";
const SELECT_BY_USER: &str = "SELECT * FROM devices WHERE user_id = ?";

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn add(&self, device: &Device) -> Result<(), HearthError> {
        sqlx::query(INSERT)
            .bind(device.device_id.as_str())
            .bind(device.channel.as_str())
            .bind(device.production_date.to_rfc3339())
            .bind(&device.warranty)
            .bind(&device.location)
            .bind(device.is_active)
            .bind(device.user_id.as_i64())
            .bind(device.home_id.map(HomeId::as_i64))
            .bind(device.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn update(&self, device: &Device) -> Result<(), HearthError> {
        sqlx::query(UPDATE)
            .bind(device.channel.as_str())
            .bind(device.production_date.to_rfc3339())
            .bind(&device.warranty)
            .bind(&device.location)
            .bind(device.is_active)
            .bind(device.user_id.as_i64())
            .bind(device.home_id.map(HomeId::as_i64))
            .bind(device.created_at.to_rfc3339())
            .bind(device.device_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DeviceId) -> Result<Option<Device>, HearthError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_channel(&self, channel: &ChannelId) -> Result<Option<Device>, HearthError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_CHANNEL)
            .bind(channel.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Device>, HearthError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
