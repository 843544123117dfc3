//! # hearth-adapter-amqp
//!
//! AMQP 0.9.1 adapter using [lapin](https://docs.rs/lapin) — the durable
//! downstream queue that encoded telemetry is forwarded to.
//!
//! ## Responsibilities
//! - Connect to the broker and declare the durable queue at startup
//! - Implement [`TelemetryPublisher`] for the ingestion path
//! - Run the consume loop, handing each delivery to a [`DeliveryHandler`]
//!
//! ## Delivery semantics
//! The consumer acknowledges on receipt, before the handler runs. A
//! handler failure or a crash mid-handle loses that payload — at-most-once
//! delivery, matching the rest of the ingestion path.
//!
//! ## Dependency rule
//! Depends on `hearth-app` (for the publisher port) and `hearth-domain`.
//! The `app` and `domain` crates must never reference this adapter.

pub mod config;
pub mod error;

use std::future::Future;

use lapin::options::{BasicConsumeOptions, BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use hearth_app::ports::TelemetryPublisher;
use hearth_domain::error::HearthError;

pub use config::AmqpConfig;
pub use error::AmqpError;

/// AMQP reply code sent with a clean close.
const REPLY_SUCCESS: u16 = 200;

/// Dial the broker, open a channel, and declare the durable queue.
///
/// Publisher and consumer each call this for a connection of their own so
/// a blocked consume channel cannot stall publishes.
async fn open(config: &AmqpConfig) -> Result<(Connection, Channel), AmqpError> {
    let connection = Connection::connect(
        &config.url,
        ConnectionProperties::default()
            .with_executor(tokio_executor_trait::Tokio::current())
            .with_reactor(tokio_reactor_trait::Tokio),
    )
    .await
    .map_err(AmqpError::Connection)?;

    let channel = connection
        .create_channel()
        .await
        .map_err(AmqpError::Connection)?;
    channel
        .queue_declare(
            &config.queue,
            QueueDeclareOptions {
                durable: true,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await
        .map_err(AmqpError::Connection)?;

    tracing::info!(queue = %config.queue, "durable queue declared");
    Ok((connection, channel))
}

async fn close(connection: &Connection) -> Result<(), AmqpError> {
    if !connection.status().connected() {
        return Ok(());
    }
    match connection.close(REPLY_SUCCESS, "shutdown").await {
        // A concurrent close already won; nothing left to do.
        Ok(()) | Err(lapin::Error::InvalidConnectionState(_)) => Ok(()),
        Err(err) => Err(AmqpError::Connection(err)),
    }
}

/// Publishing half of the downstream queue.
pub struct QueuePublisher {
    connection: Connection,
    channel: Channel,
    queue: String,
}

impl QueuePublisher {
    /// Connect and declare the queue.
    ///
    /// # Errors
    ///
    /// Returns [`AmqpError::Connection`] when the broker is unreachable or
    /// the declare fails; callers treat that as fatal at startup.
    pub async fn connect(config: &AmqpConfig) -> Result<Self, AmqpError> {
        let (connection, channel) = open(config).await?;
        Ok(Self {
            connection,
            channel,
            queue: config.queue.clone(),
        })
    }

    /// Close the connection. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns [`AmqpError::Connection`] when the close handshake fails.
    pub async fn close(&self) -> Result<(), AmqpError> {
        close(&self.connection).await
    }
}

impl TelemetryPublisher for QueuePublisher {
    async fn publish(&self, payload: &[u8]) -> Result<(), HearthError> {
        self.channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default().with_content_type("application/json".into()),
            )
            .await
            .map_err(|err| AmqpError::Publish(err).into_domain())?
            .await
            .map_err(|err| AmqpError::Publish(err).into_domain())?;
        Ok(())
    }
}

/// Receives queued payloads, one call per delivery.
///
/// The delivery is already acknowledged when `handle` runs; a failure
/// here loses the payload.
pub trait DeliveryHandler {
    /// Process one payload. Errors are logged by the consume loop and the
    /// payload dropped.
    fn handle(&self, payload: &[u8]) -> impl Future<Output = Result<(), HearthError>> + Send;
}

/// Consuming half of the downstream queue.
pub struct QueueConsumer {
    connection: Connection,
    channel: Channel,
    queue: String,
}

impl QueueConsumer {
    /// Connect and declare the queue.
    ///
    /// # Errors
    ///
    /// Returns [`AmqpError::Connection`] when the broker is unreachable or
    /// the declare fails; callers treat that as fatal at startup.
    pub async fn connect(config: &AmqpConfig) -> Result<Self, AmqpError> {
        let (connection, channel) = open(config).await?;
        Ok(Self {
            connection,
            channel,
            queue: config.queue.clone(),
        })
    }

    /// Deliver queued payloads to `handler` until `cancel` fires or the
    /// stream ends.
    ///
    /// Deliveries arrive with `no_ack` set, so the broker considers each
    /// one settled the moment it is sent; handler failures are logged and
    /// the payload is gone.
    ///
    /// # Errors
    ///
    /// Returns [`AmqpError::Consume`] when the consume cannot be started
    /// or the stream reports a broker failure.
    pub async fn run<H>(&self, handler: H, cancel: CancellationToken) -> Result<(), AmqpError>
    where
        H: DeliveryHandler + Send + Sync,
    {
        let mut deliveries = self
            .channel
            .basic_consume(
                &self.queue,
                "",
                BasicConsumeOptions {
                    no_ack: true,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(AmqpError::Consume)?;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("queue consumer stopping");
                    return Ok(());
                }
                delivery = deliveries.next() => match delivery {
                    Some(Ok(delivery)) => {
                        if let Err(err) = handler.handle(&delivery.data).await {
                            tracing::warn!(error = %err, "queued payload handler failed");
                        }
                    }
                    Some(Err(err)) => return Err(AmqpError::Consume(err)),
                    None => {
                        tracing::debug!("consume stream ended");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Close the connection. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns [`AmqpError::Connection`] when the close handshake fails.
    pub async fn close(&self) -> Result<(), AmqpError> {
        close(&self.connection).await
    }
}
