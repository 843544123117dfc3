//! JSON REST handlers for homes and their memberships.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use hearth_app::ports::{
    DeviceRepository, HomeRepository, RoleRepository, TelemetryRepository, UserRepository,
};
use hearth_domain::home::{Home, NewHome};
use hearth_domain::id::{HomeId, UserId};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/home`.
#[derive(Deserialize)]
pub struct CreateHomeRequest {
    pub name: String,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Home>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Request body for `POST /api/home/add-user`.
#[derive(Deserialize)]
pub struct AddMemberRequest {
    pub home_id: i64,
    pub user_id: i64,
    pub role: String,
}

/// Possible responses from the add-user endpoint.
pub enum AddMemberResponse {
    NoContent,
}

impl IntoResponse for AddMemberResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Home>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/home`
///
/// The authenticated caller becomes the home's owner member.
pub async fn create<UR, RR, HR, DR, TR>(
    State(state): State<AppState<UR, RR, HR, DR, TR>>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateHomeRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    let home = state
        .home_service
        .create_home(NewHome {
            name: req.name,
            owner: user.id,
        })
        .await?;
    Ok(CreateResponse::Created(Json(home)))
}

/// `POST /api/home/add-user`
pub async fn add_member<UR, RR, HR, DR, TR>(
    State(state): State<AppState<UR, RR, HR, DR, TR>>,
    AuthUser(_user): AuthUser,
    Json(req): Json<AddMemberRequest>,
) -> Result<AddMemberResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    state
        .home_service
        .add_member(HomeId::new(req.home_id), UserId::new(req.user_id), &req.role)
        .await?;
    Ok(AddMemberResponse::NoContent)
}

/// `GET /api/home/list`
///
/// Lists the homes of the authenticated caller.
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
    let homes = state.home_service.homes_for_user(user.id).await?;
    Ok(ListResponse::Ok(Json(homes)))
}
