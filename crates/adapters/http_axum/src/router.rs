//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use hearth_app::ports::{
    DeviceRepository, HomeRepository, RoleRepository, TelemetryRepository, UserRepository,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the API routes under `/api` and a plain-text health probe at
/// `/health`. Includes a [`TraceLayer`] that logs each HTTP
/// request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build<UR, RR, HR, DR, TR>(state: AppState<UR, RR, HR, DR, TR>) -> Router
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
