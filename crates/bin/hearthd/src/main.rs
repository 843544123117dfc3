//! # hearthd — hearth daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Open the broker session and the downstream queue connections
//! - Spawn the background loops (message pump, reconciler, queue consumer)
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use hearth_adapter_amqp::{DeliveryHandler, QueueConsumer, QueuePublisher};
use hearth_adapter_http_axum::auth;
use hearth_adapter_http_axum::state::AppState;
use hearth_adapter_mqtt::{MessagePump, MqttSession};
use hearth_adapter_storage_sqlite_sqlx::{
    SqliteDeviceRepository, SqliteHomeRepository, SqliteRoleRepository,
    SqliteTelemetryRepository, SqliteUserRepository,
};
use hearth_app::reconciler::SubscriptionReconciler;
use hearth_app::services::device_service::DeviceService;
use hearth_app::services::home_service::HomeService;
use hearth_app::services::telemetry_service::TelemetryService;
use hearth_app::services::user_service::UserService;
use hearth_app::subscription::SubscriptionSet;
use hearth_domain::error::HearthError;

use crate::config::Config;

/// Logs each payload drained from the downstream queue.
///
/// Stands in for a real downstream processor so forwarded telemetry can
/// be observed end to end.
struct LoggingHandler;

impl DeliveryHandler for LoggingHandler {
    async fn handle(&self, payload: &[u8]) -> Result<(), HearthError> {
        match std::str::from_utf8(payload) {
            Ok(text) => tracing::info!(payload = %text, "telemetry delivered downstream"),
            Err(_) => tracing::info!(bytes = payload.len(), "telemetry delivered downstream"),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();
    if config.auth.secret == config::AuthConfig::default().secret {
        tracing::warn!("using the built-in token secret, set HEARTH_AUTH_SECRET in production");
    }

    // Database
    let db = hearth_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Downstream queue — fatal when unreachable, nothing could be forwarded.
    let publisher = Arc::new(QueuePublisher::connect(&config.amqp).await?);
    let consumer = QueueConsumer::connect(&config.amqp).await?;

    // Broker session — fatal when refused, ingestion would be dead on arrival.
    let (session, mut eventloop) = MqttSession::connect(&config.mqtt)?;
    MqttSession::wait_until_connected(&mut eventloop).await?;

    // Background loops
    let cancel = CancellationToken::new();

    let telemetry_service = Arc::new(TelemetryService::new(
        SqliteDeviceRepository::new(pool.clone()),
        SqliteTelemetryRepository::new(pool.clone()),
        Arc::clone(&publisher),
    ));
    let pump = MessagePump::new(telemetry_service);
    let pump_cancel = cancel.clone();
    let pump_task = tokio::spawn(async move {
        if let Err(err) = pump.run(eventloop, pump_cancel).await {
            tracing::error!(error = %err, "message pump terminated");
        }
    });

    let reconciler = SubscriptionReconciler::new(
        SqliteDeviceRepository::new(pool.clone()),
        session.clone(),
        Arc::new(SubscriptionSet::new()),
        config.mqtt.account_id,
    );
    let reconciler_cancel = cancel.clone();
    let reconciler_task = tokio::spawn(async move { reconciler.run(reconciler_cancel).await });

    let consumer_cancel = cancel.clone();
    let consumer_task = tokio::spawn(async move {
        if let Err(err) = consumer.run(LoggingHandler, consumer_cancel).await {
            tracing::error!(error = %err, "queue consumer failed");
        }
        if let Err(err) = consumer.close().await {
            tracing::warn!(error = %err, "queue consumer close failed");
        }
    });

    // HTTP
    let state = AppState::new(
        UserService::new(SqliteUserRepository::new(pool.clone())),
        HomeService::new(
            SqliteHomeRepository::new(pool.clone()),
            SqliteRoleRepository::new(pool.clone()),
        ),
        DeviceService::new(SqliteDeviceRepository::new(pool.clone())),
        SqliteTelemetryRepository::new(pool),
        auth::AuthConfig::new(
            &config.auth.secret,
            Duration::from_secs(config.auth.token_ttl_secs),
        ),
    );
    let app = hearth_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!("hearthd listening on http://{bind_addr}");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Serve has returned; wind down the background loops.
    cancel.cancel();
    let _ = tokio::join!(pump_task, reconciler_task, consumer_task);
    if let Err(err) = publisher.close().await {
        tracing::warn!(error = %err, "queue publisher close failed");
    }

    Ok(())
}

/// Resolve when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut signal) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            signal.recv().await;
        } else {
            // No handler, nothing will ever resolve this branch.
            std::future::pending::<()>().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
