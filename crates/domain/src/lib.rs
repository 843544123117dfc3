//! # hearth-domain
//!
//! Pure domain model for the hearth IoT management backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Users** and **Roles** (accounts and per-home access levels)
//! - Define **Homes** (households grouping devices and member accounts)
//! - Define **Devices** (hardware units addressed by a unique transport channel)
//! - Define **Telemetry** (dynamically-typed observations reported by devices)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod home;
pub mod telemetry;
pub mod user;
