//! # hearth-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UserRepository` — accounts keyed by username
//!   - `RoleRepository` — lookup of the fixed role catalogue
//!   - `HomeRepository` — homes and their member/role assignments
//!   - `DeviceRepository` — devices, including lookup by channel
//!   - `TelemetryRepository` — append & query telemetry records
//!   - `TelemetryPublisher` — hand decoded records to the downstream queue
//!   - `TopicSubscriber` — ask the broker session for one more channel
//! - Define **driving/inbound ports** as use-case structs:
//!   - `UserService` — register, look up accounts
//!   - `HomeService` — create homes, manage membership and roles
//!   - `DeviceService` — register, assign to homes, list
//!   - `TelemetryService` — decode, persist, and forward device payloads
//!   - `SubscriptionReconciler` — keep broker subscriptions covering the roster
//! - Provide **in-process infrastructure** (the subscription set) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `hearth-domain` only (plus `tokio` for timers and
//! cancellation). Never imports adapter crates. Adapters depend on *this*
//! crate, not the reverse.

pub mod ports;
pub mod reconciler;
pub mod services;
pub mod subscription;
