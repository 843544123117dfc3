//! `SQLite` implementation of [`HomeRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use hearth_app::ports::HomeRepository;
use hearth_domain::error::HearthError;
use hearth_domain::home::{Home, HomeMember, NewHome};
use hearth_domain::id::{HomeId, RoleId, UserId};
use hearth_domain::time;
use hearth_domain::user::Role;

use crate::error::StorageError;

struct Wrapper(Home);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let owner_id: i64 = row.try_get("owner_id")?;
        let created_at_str: String = row.try_get("created_at")?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(Home {
            id: HomeId::new(id),
            name,
            owner: UserId::new(owner_id),
            created_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO homes (name, owner_id, created_at)
    VALUES (?, ?, ?)
";

const SELECT_BY_USER: &str = r"
    SELECT homes.* FROM homes
    JOIN home_members ON home_members.home_id = homes.id
    WHERE home_members.user_id = ?
";

const INSERT_MEMBER: &str = r"
    INSERT INTO home_members (home_id, user_id, role_id)
    VALUES (?, ?, ?)
";

const SELECT_MEMBER_ROLE: &str = r"
    SELECT roles.id, roles.name FROM roles
    JOIN home_members ON home_members.role_id = roles.id
    WHERE home_members.home_id = ? AND home_members.user_id = ?
";

/// `SQLite`-backed home repository.
pub struct SqliteHomeRepository {
    pool: SqlitePool,
}

impl SqliteHomeRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl HomeRepository for SqliteHomeRepository {
    async fn add(&self, home: &NewHome) -> Result<Home, HearthError> {
        let created_at = time::now();
        let result = sqlx::query(INSERT)
            .bind(&home.name)
            .bind(home.owner.as_i64())
            .bind(created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Home {
            id: HomeId::new(result.last_insert_rowid()),
            name: home.name.clone(),
            owner: home.owner,
            created_at,
        })
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Home>, HearthError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn add_member(&self, member: HomeMember) -> Result<(), HearthError> {
        sqlx::query(INSERT_MEMBER)
            .bind(member.home_id.as_i64())
            .bind(member.user_id.as_i64())
            .bind(member.role_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    async fn member_role(
        &self,
        home_id: HomeId,
        user_id: UserId,
    ) -> Result<Option<Role>, HearthError> {
        let row: Option<(i64, String)> = sqlx::query_as(SELECT_MEMBER_ROLE)
            .bind(home_id.as_i64())
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|(id, name)| Role {
            id: RoleId::new(id),
            name,
        }))
    }
}
