//! AMQP adapter error types.

use hearth_domain::error::HearthError;

/// Errors specific to the AMQP adapter.
#[derive(Debug, thiserror::Error)]
pub enum AmqpError {
    /// Connecting, opening the channel, or declaring the queue failed.
    #[error("AMQP connection error")]
    Connection(#[source] lapin::Error),

    /// A publish could not be sent or was rejected.
    #[error("AMQP publish error")]
    Publish(#[source] lapin::Error),

    /// The consume stream failed.
    #[error("AMQP consume error")]
    Consume(#[source] lapin::Error),
}

impl AmqpError {
    /// Convert into the matching [`HearthError`] variant for propagation
    /// across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> HearthError {
        match self {
            Self::Publish(_) => HearthError::Publish(Box::new(self)),
            Self::Connection(_) | Self::Consume(_) => HearthError::Transport(Box::new(self)),
        }
    }
}

impl From<AmqpError> for HearthError {
    fn from(err: AmqpError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_publish_failure_to_publish_error() {
        let err: HearthError = AmqpError::Publish(lapin::Error::ChannelsLimitReached).into();
        assert!(matches!(err, HearthError::Publish(_)));
    }

    #[test]
    fn should_convert_connection_failure_to_transport_error() {
        let err: HearthError = AmqpError::Connection(lapin::Error::ChannelsLimitReached).into();
        assert!(matches!(err, HearthError::Transport(_)));
    }

    #[test]
    fn should_display_connection_error() {
        let err = AmqpError::Connection(lapin::Error::ChannelsLimitReached);
        assert_eq!(err.to_string(), "AMQP connection error");
    }
}
