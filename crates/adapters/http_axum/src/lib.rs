//! # hearth-adapter-http-axum
//!
//! HTTP adapter using [axum](https://docs.rs/axum) — serves the JSON REST
//! API.
//!
//! ## Responsibilities
//! - Route registration/login plus the bearer-guarded home, device, and
//!   analytics endpoints
//! - Hash credentials (bcrypt) and issue/verify tokens (JWT, HS256)
//! - Map [`HearthError`](hearth_domain::error::HearthError) values onto
//!   HTTP status codes
//!
//! ## Dependency rule
//! Depends on `hearth-app` (services and ports) and `hearth-domain`.
//! The `app` and `domain` crates must never reference this adapter.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod state;
