//! # hearth-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `hearth-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `hearth-app` (for port traits) and `hearth-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod device_repo;
pub mod error;
pub mod home_repo;
pub mod pool;
pub mod role_repo;
pub mod telemetry_repo;
pub mod user_repo;

pub use device_repo::SqliteDeviceRepository;
pub use home_repo::SqliteHomeRepository;
pub use pool::{Config, Database};
pub use role_repo::SqliteRoleRepository;
pub use telemetry_repo::SqliteTelemetryRepository;
pub use user_repo::SqliteUserRepository;
