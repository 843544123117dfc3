//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hearth_app::ports::{
    DeviceRepository, HomeRepository, RoleRepository, TelemetryRepository, UserRepository,
};
use hearth_domain::device::Device;
use hearth_domain::id::{DeviceId, HomeId};
use hearth_domain::time::Timestamp;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/device`.
#[derive(Deserialize)]
pub struct RegisterDeviceRequest {
    pub device_id: String,
    pub channel: String,
    pub production_date: Option<Timestamp>,
    pub warranty: Option<String>,
    pub location: Option<String>,
    pub home_id: Option<i64>,
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<Device>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Request body for `POST /api/device/assign-home`.
#[derive(Deserialize)]
pub struct AssignHomeRequest {
    pub device_id: String,
    pub home_id: i64,
}

/// Possible responses from the assign-home endpoint.
pub enum AssignHomeResponse {
    Ok(Json<Device>),
}

impl IntoResponse for AssignHomeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/device`
///
/// Registers the device to the authenticated caller. New devices default
/// to active with `created_at` stamped now.
pub async fn register<UR, RR, HR, DR, TR>(
    State(state): State<AppState<UR, RR, HR, DR, TR>>,
    AuthUser(user): AuthUser,
    Json(req): Json<RegisterDeviceRequest>,
) -> Result<RegisterResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    let mut builder = Device::builder()
        .device_id(req.device_id)
        .channel(req.channel)
        .user_id(user.id);
    if let Some(production_date) = req.production_date {
        builder = builder.production_date(production_date);
    }
    if let Some(warranty) = req.warranty {
        builder = builder.warranty(warranty);
    }
    if let Some(location) = req.location {
        builder = builder.location(location);
    }
    if let Some(home_id) = req.home_id {
        builder = builder.home_id(HomeId::new(home_id));
    }

    let device = builder.build()?;
    let created = state.device_service.register_device(device).await?;
    Ok(RegisterResponse::Created(Json(created)))
}

/// `POST /api/device/assign-home`
pub async fn assign_home<UR, RR, HR, DR, TR>(
    State(state): State<AppState<UR, RR, HR, DR, TR>>,
    AuthUser(_user): AuthUser,
    Json(req): Json<AssignHomeRequest>,
) -> Result<AssignHomeResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    let device = state
        .device_service
        .assign_home(&DeviceId::new(req.device_id), HomeId::new(req.home_id))
        .await?;
    Ok(AssignHomeResponse::Ok(Json(device)))
}

/// `GET /api/device/list`
///
/// Lists the devices registered by the authenticated caller.
pub async fn list<UR, RR, HR, DR, TR>(
    State(state): State<AppState<UR, RR, HR, DR, TR>>,
    AuthUser(user): AuthUser,
) -> Result<ListResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    let devices = state.device_service.devices_for_user(user.id).await?;
    Ok(ListResponse::Ok(Json(devices)))
}
