//! Telemetry — dynamically-typed observations reported by devices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, HomeId};

/// A single dynamically-typed telemetry value.
///
/// Untagged so the JSON wire form survives decode, storage, and re-encode
/// unchanged. `Int` precedes `Float` so integral numbers keep their
/// integral form on the way through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<TelemetryValue>),
    Object(BTreeMap<String, TelemetryValue>),
}

/// The key→value document carried by one telemetry message.
///
/// Device payloads are JSON objects with arbitrary keys; anything else is
/// malformed.
pub type TelemetryMap = BTreeMap<String, TelemetryValue>;

/// One persisted observation reported by a device.
///
/// `home_id` is copied from the device at the time the message is
/// received; records are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub device_id: DeviceId,
    pub home_id: Option<HomeId>,
    pub data: TelemetryMap,
}
