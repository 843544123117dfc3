//! # hearth-adapter-mqtt
//!
//! MQTT adapter using [rumqttc](https://docs.rs/rumqttc) — the broker
//! session that feeds telemetry ingestion.
//!
//! ## Responsibilities
//! - Open and hold the broker connection (plain TCP or TLS)
//! - Implement [`TopicSubscriber`] so the reconciler can grow the
//!   subscription set
//! - Pump the event loop: hand every inbound publish to the telemetry
//!   service and let rumqttc's reconnect deal with transient outages
//!
//! ## Dependency rule
//! Depends on `hearth-app` (for ports and the telemetry service) and
//! `hearth-domain`. The `app` and `domain` crates must never reference
//! this adapter.

pub mod config;
pub mod error;
mod tls;

use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, Publish, QoS};
use tokio_util::sync::CancellationToken;

use hearth_app::ports::{
    DeviceRepository, TelemetryPublisher, TelemetryRepository, TopicSubscriber,
};
use hearth_app::services::telemetry_service::TelemetryService;
use hearth_domain::error::HearthError;
use hearth_domain::id::ChannelId;

pub use config::{MqttConfig, TlsConfig, TlsMode};
pub use error::MqttError;

/// Capacity of the request channel between [`AsyncClient`] and its event
/// loop.
const REQUEST_CHANNEL_CAPACITY: usize = 10;

/// Consecutive poll failures tolerated before the pump gives up.
const MAX_CONSECUTIVE_ERRORS: u32 = 3;

/// Pause between poll attempts while the broker is unreachable.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Handle to the broker session.
///
/// Cheap to clone; the underlying [`AsyncClient`] is a sender onto the
/// request channel drained by the event loop.
#[derive(Clone)]
pub struct MqttSession {
    client: AsyncClient,
}

impl MqttSession {
    /// Build the session and its event loop from configuration.
    ///
    /// No network traffic happens here — the connection is established by
    /// the first poll. TLS material is read eagerly so a bad certificate
    /// path fails at startup instead of on first connect.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::MissingCa`] or [`MqttError::TlsFile`] when
    /// the TLS configuration cannot be realised.
    pub fn connect(config: &MqttConfig) -> Result<(Self, EventLoop), MqttError> {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username.clone(), password.clone());
        }
        if let Some(transport) = tls::transport(&config.tls)? {
            options.set_transport(transport);
        }

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);
        Ok((Self { client }, eventloop))
    }

    /// Drive the event loop until the broker acknowledges the connection.
    ///
    /// Called once at startup so a wrong address or refused session aborts
    /// the process instead of retrying silently in the background.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Connection`] on the first poll failure,
    /// including a broker that refuses the session.
    pub async fn wait_until_connected(eventloop: &mut EventLoop) -> Result<(), MqttError> {
        loop {
            match eventloop.poll().await.map_err(MqttError::Connection)? {
                Event::Incoming(Packet::ConnAck(ack)) => {
                    tracing::info!(code = ?ack.code, "connected to MQTT broker");
                    return Ok(());
                }
                event => tracing::trace!(?event, "pre-connack event"),
            }
        }
    }
}

impl TopicSubscriber for MqttSession {
    async fn subscribe(&self, channel: &ChannelId) -> Result<(), HearthError> {
        // QoS 0: the ingestion path is at-most-once end to end.
        self.client
            .subscribe(channel.as_str(), QoS::AtMostOnce)
            .await
            .map_err(|err| MqttError::Client(err).into_domain())
    }
}

/// Drives the broker event loop and feeds inbound publishes to the
/// telemetry service.
pub struct MessagePump<D, T, P> {
    service: Arc<TelemetryService<D, T, P>>,
}

impl<D, T, P> MessagePump<D, T, P>
where
    D: DeviceRepository + Send + Sync + 'static,
    T: TelemetryRepository + Send + Sync + 'static,
    P: TelemetryPublisher + Send + Sync + 'static,
{
    /// Create a pump that hands messages to `service`.
    pub fn new(service: Arc<TelemetryService<D, T, P>>) -> Self {
        Self { service }
    }

    /// Poll the event loop until `cancel` fires or the broker stays
    /// unreachable.
    ///
    /// Every inbound publish runs in its own task so a slow insert cannot
    /// back up the socket; per-message failures are logged and the message
    /// dropped. Poll failures lean on rumqttc's reconnect, but after
    /// [`MAX_CONSECUTIVE_ERRORS`] failures in a row the pump stops and
    /// returns the last error.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Connection`] when the failure cap is reached.
    pub async fn run(
        &self,
        mut eventloop: EventLoop,
        cancel: CancellationToken,
    ) -> Result<(), MqttError> {
        let mut consecutive_errors = 0u32;
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("message pump stopping");
                    return Ok(());
                }
                event = eventloop.poll() => match event {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        consecutive_errors = 0;
                        self.dispatch(publish);
                    }
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        consecutive_errors = 0;
                        tracing::info!("MQTT session established");
                    }
                    Ok(_) => consecutive_errors = 0,
                    Err(err) => {
                        consecutive_errors += 1;
                        tracing::warn!(
                            error = %err,
                            attempt = consecutive_errors,
                            "MQTT poll failed"
                        );
                        if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                            tracing::error!("MQTT broker unreachable, stopping message pump");
                            return Err(MqttError::Connection(err));
                        }
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }
    }

    fn dispatch(&self, publish: Publish) {
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let channel = ChannelId::new(publish.topic);
            if let Err(err) = service.ingest(&channel, &publish.payload).await {
                tracing::warn!(channel = %channel, error = %err, "telemetry message dropped");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::Mutex;

    use hearth_domain::device::Device;
    use hearth_domain::id::{DeviceId, UserId};
    use hearth_domain::telemetry::TelemetryRecord;

    use super::*;

    // ── In-memory ports ────────────────────────────────────────────

    #[derive(Default)]
    struct EmptyDeviceRepo;

    impl DeviceRepository for EmptyDeviceRepo {
        fn add(&self, _device: &Device) -> impl Future<Output = Result<(), HearthError>> + Send {
            async { Ok(()) }
        }

        fn update(&self, _device: &Device) -> impl Future<Output = Result<(), HearthError>> + Send {
            async { Ok(()) }
        }

        fn find_by_id(
            &self,
            _id: &DeviceId,
        ) -> impl Future<Output = Result<Option<Device>, HearthError>> + Send {
            async { Ok(None) }
        }

        fn find_by_channel(
            &self,
            _channel: &ChannelId,
        ) -> impl Future<Output = Result<Option<Device>, HearthError>> + Send {
            async { Ok(None) }
        }

        fn find_by_user(
            &self,
            _user_id: UserId,
        ) -> impl Future<Output = Result<Vec<Device>, HearthError>> + Send {
            async { Ok(Vec::new()) }
        }
    }

    #[derive(Default)]
    struct NullTelemetryRepo;

    impl TelemetryRepository for NullTelemetryRepo {
        fn append(
            &self,
            _record: &TelemetryRecord,
        ) -> impl Future<Output = Result<(), HearthError>> + Send {
            async { Ok(()) }
        }

        fn find_by_device(
            &self,
            _device_id: &DeviceId,
        ) -> impl Future<Output = Result<Vec<TelemetryRecord>, HearthError>> + Send {
            async { Ok(Vec::new()) }
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        payloads: Mutex<Vec<Vec<u8>>>,
    }

    impl TelemetryPublisher for RecordingPublisher {
        fn publish(&self, payload: &[u8]) -> impl Future<Output = Result<(), HearthError>> + Send {
            self.payloads.lock().unwrap().push(payload.to_vec());
            async { Ok(()) }
        }
    }

    fn service() -> Arc<TelemetryService<EmptyDeviceRepo, NullTelemetryRepo, RecordingPublisher>> {
        Arc::new(TelemetryService::new(
            EmptyDeviceRepo,
            NullTelemetryRepo,
            RecordingPublisher::default(),
        ))
    }

    // ── Session construction ───────────────────────────────────────

    #[tokio::test]
    async fn should_build_session_from_default_config() {
        let result = MqttSession::connect(&MqttConfig::default());
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_fail_to_build_session_when_tls_files_missing() {
        let config = MqttConfig {
            tls: TlsConfig {
                mode: TlsMode::Verified,
                ..TlsConfig::default()
            },
            ..MqttConfig::default()
        };
        let result = MqttSession::connect(&config);
        assert!(matches!(result, Err(MqttError::MissingCa)));
    }

    // ── Subscribe requests ─────────────────────────────────────────

    #[tokio::test]
    async fn should_queue_subscribe_request_without_broker() {
        // The request channel buffers the subscribe until the event loop
        // drains it, so no broker is needed to exercise the port impl.
        let (session, _eventloop) = MqttSession::connect(&MqttConfig::default()).unwrap();
        let channel = ChannelId::new("home/1/dev-1");

        let result = session.subscribe(&channel).await;
        assert!(result.is_ok());
    }

    // ── Message pump lifecycle ─────────────────────────────────────

    #[tokio::test]
    async fn should_stop_pump_when_cancelled() {
        let (_session, eventloop) = MqttSession::connect(&MqttConfig::default()).unwrap();
        let pump = MessagePump::new(service());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), pump.run(eventloop, cancel))
            .await
            .expect("pump should stop promptly once cancelled");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_give_up_pump_after_repeated_poll_failures() {
        // Point the session at a port nothing listens on; every poll fails
        // until the failure cap trips.
        let config = MqttConfig {
            broker_host: "127.0.0.1".to_string(),
            broker_port: 1,
            ..MqttConfig::default()
        };
        let (_session, eventloop) = MqttSession::connect(&config).unwrap();
        let pump = MessagePump::new(service());

        let result = tokio::time::timeout(
            Duration::from_secs(30),
            pump.run(eventloop, CancellationToken::new()),
        )
        .await
        .expect("pump should give up after the failure cap");
        assert!(matches!(result, Err(MqttError::Connection(_))));
    }
}
