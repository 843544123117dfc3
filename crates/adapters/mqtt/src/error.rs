//! MQTT adapter error types.

use std::path::PathBuf;

use hearth_domain::error::HearthError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// The broker connection failed.
    #[error("MQTT connection error")]
    Connection(#[source] rumqttc::ConnectionError),

    /// A TLS certificate or key file could not be read.
    #[error("failed to read TLS file {}", path.display())]
    TlsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Verified TLS was requested without a CA certificate.
    #[error("TLS mode 'verified' requires ca_file")]
    MissingCa,

    /// A domain-level error (validation, not-found, etc.).
    #[error("domain error")]
    Domain(#[source] HearthError),
}

impl MqttError {
    /// Convert into a [`HearthError::Transport`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> HearthError {
        match self {
            Self::Domain(err) => err,
            other => HearthError::Transport(Box::new(other)),
        }
    }
}

impl From<MqttError> for HearthError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
