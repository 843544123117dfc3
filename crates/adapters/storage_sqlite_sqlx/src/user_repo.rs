//! `SQLite` implementation of [`UserRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use hearth_app::ports::UserRepository;
use hearth_domain::error::HearthError;
use hearth_domain::id::UserId;
use hearth_domain::user::{NewUser, User};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let password_hash: String = row.try_get("password_hash")?;
        let email: String = row.try_get("email")?;

        Ok(Self(User {
            id: UserId::new(id),
            username,
            password_hash,
            email,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (username, password_hash, email)
    VALUES (?, ?, ?)
";

const SELECT_BY_USERNAME: &str = "SELECT * FROM users WHERE username = ?";

/// `SQLite`-backed user repository.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn add(&self, user: &NewUser) -> Result<User, HearthError> {
        let result = sqlx::query(INSERT)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(User {
            id: UserId::new(result.last_insert_rowid()),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            email: user.email.clone(),
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, HearthError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }
}
