//! `SQLite` implementation of [`RoleRepository`].
//!
//! The role catalogue is seeded by the initial migration and never written
//! at runtime, so this repository is lookup-only.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use hearth_app::ports::RoleRepository;
use hearth_domain::error::HearthError;
use hearth_domain::id::RoleId;
use hearth_domain::user::Role;

use crate::error::StorageError;

struct Wrapper(Role);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Role> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;

        Ok(Self(Role {
            id: RoleId::new(id),
            name,
        }))
    }
}

const SELECT_BY_NAME: &str = "SELECT * FROM roles WHERE name = ?";

/// `SQLite`-backed role repository.
pub struct SqliteRoleRepository {
    pool: SqlitePool,
}

impl SqliteRoleRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RoleRepository for SqliteRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, HearthError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }
}
