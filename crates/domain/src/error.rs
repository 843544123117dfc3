//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HearthError`] at the boundary. Per-message ingestion errors are
//! logged and dropped by the callers; startup errors abort the process.

use std::error::Error;

/// Top-level error for all hearth operations.
#[derive(Debug, thiserror::Error)]
pub enum HearthError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// An inbound payload could not be decoded.
    #[error("malformed payload")]
    MalformedPayload(#[from] serde_json::Error),

    /// The persistence layer failed.
    #[error("storage failure")]
    Storage(#[source] Box<dyn Error + Send + Sync>),

    /// Forwarding to the downstream queue failed.
    #[error("downstream publish failure")]
    Publish(#[source] Box<dyn Error + Send + Sync>),

    /// The broker connection or a broker operation failed.
    #[error("transport failure")]
    Transport(#[source] Box<dyn Error + Send + Sync>),
}

impl HearthError {
    /// Wrap a persistence-layer failure.
    #[must_use]
    pub fn storage(source: impl Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(source))
    }

    /// Wrap a downstream-publish failure.
    #[must_use]
    pub fn publish(source: impl Error + Send + Sync + 'static) -> Self {
        Self::Publish(Box::new(source))
    }

    /// Wrap a broker transport failure.
    #[must_use]
    pub fn transport(source: impl Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(source))
    }
}

/// A lookup failed to resolve the requested record.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Entity kind, e.g. `"Device"` or `"User"`.
    pub entity: &'static str,
    /// The identifier that failed to resolve.
    pub id: String,
}

/// A domain invariant was violated while constructing or mutating a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("device id must not be empty")]
    EmptyDeviceId,
    #[error("channel must not be empty")]
    EmptyChannel,
}
