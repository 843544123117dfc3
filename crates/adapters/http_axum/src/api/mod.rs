//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod analytics;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod homes;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Router;
use axum::routing::{get, post};

use hearth_app::ports::{
    DeviceRepository, HomeRepository, RoleRepository, TelemetryRepository, UserRepository,
};

use crate::state::AppState;

/// Build the `/api` sub-router.
///
/// `/register` and `/login` are public; every other route requires a
/// bearer token via the [`AuthUser`](crate::auth::AuthUser) extractor.
pub fn routes<UR, RR, HR, DR, TR>() -> Router<AppState<UR, RR, HR, DR, TR>>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    Router::new()
        // Accounts
        .route("/register", post(users::register::<UR, RR, HR, DR, TR>))
        .route("/login", post(users::login::<UR, RR, HR, DR, TR>))
        // Homes
        .route("/home", post(homes::create::<UR, RR, HR, DR, TR>))
        .route(
            "/home/add-user",
            post(homes::add_member::<UR, RR, HR, DR, TR>),
        )
        .route("/home/list", get(homes::list::<UR, RR, HR, DR, TR>))
        // Devices
        .route("/device", post(devices::register::<UR, RR, HR, DR, TR>))
        .route(
            "/device/assign-home",
            post(devices::assign_home::<UR, RR, HR, DR, TR>),
        )
        .route("/device/list", get(devices::list::<UR, RR, HR, DR, TR>))
        // Analytics
        .route(
            "/device-analytics",
            get(analytics::device::<UR, RR, HR, DR, TR>),
        )
}
