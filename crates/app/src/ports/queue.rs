//! Queue port — downstream handoff of encoded telemetry.

use std::future::Future;

use hearth_domain::error::HearthError;

/// Publishes opaque byte payloads to the durable downstream queue.
pub trait TelemetryPublisher {
    /// Enqueue one payload.
    ///
    /// Failures surface as [`HearthError::Publish`]; callers in the
    /// ingestion path log and drop rather than retry.
    fn publish(&self, payload: &[u8]) -> impl Future<Output = Result<(), HearthError>> + Send;
}

impl<T: TelemetryPublisher + Send + Sync> TelemetryPublisher for std::sync::Arc<T> {
    fn publish(&self, payload: &[u8]) -> impl Future<Output = Result<(), HearthError>> + Send {
        (**self).publish(payload)
    }
}
