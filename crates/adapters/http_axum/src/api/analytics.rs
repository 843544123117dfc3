//! JSON REST handler for per-device telemetry history.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hearth_app::ports::{
    DeviceRepository, HomeRepository, RoleRepository, TelemetryRepository, UserRepository,
};
use hearth_domain::id::DeviceId;
use hearth_domain::telemetry::TelemetryRecord;

use crate::auth::{AuthError, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for `GET /api/device-analytics`.
#[derive(Deserialize)]
pub struct AnalyticsQuery {
    pub device_id: String,
}

/// Possible responses from the analytics endpoint.
pub enum AnalyticsResponse {
    Ok(Json<Vec<TelemetryRecord>>),
}

impl IntoResponse for AnalyticsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/device-analytics?device_id=…`
///
/// Returns the stored telemetry history of one device, oldest first.
/// Restricted to callers holding the `owner` role in the device's home;
/// a device outside any home has no membership to check and is refused
/// the same way.
pub async fn device<UR, RR, HR, DR, TR>(
    State(state): State<AppState<UR, RR, HR, DR, TR>>,
    AuthUser(user): AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<AnalyticsResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    let device_id = DeviceId::new(query.device_id);
    let device = state.device_service.get_device(&device_id).await?;
    let home_id = device.home_id.ok_or(AuthError::Forbidden)?;

    let role = state
        .home_service
        .member_role(home_id, user.id)
        .await?
        .ok_or(AuthError::Forbidden)?;
    if !role.is_owner() {
        return Err(AuthError::Forbidden.into());
    }

    let records = state.telemetry_repo.find_by_device(&device_id).await?;
    Ok(AnalyticsResponse::Ok(Json(records)))
}
