//! JSON REST handlers for accounts: registration and login.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use hearth_app::ports::{
    DeviceRepository, HomeRepository, RoleRepository, TelemetryRepository, UserRepository,
};
use hearth_domain::error::{HearthError, ValidationError};
use hearth_domain::id::UserId;
use hearth_domain::user::NewUser;

use crate::auth::{self, AuthError};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/register`.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// Public view of an account, without the credential digest.
#[derive(Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<UserProfile>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Request body for `POST /api/login`.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body carrying a freshly issued bearer token.
#[derive(Serialize)]
pub struct TokenBody {
    pub token: String,
}

/// Possible responses from the login endpoint.
pub enum LoginResponse {
    Ok(Json<TokenBody>),
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/register`
pub async fn register<UR, RR, HR, DR, TR>(
    State(state): State<AppState<UR, RR, HR, DR, TR>>,
    Json(req): Json<RegisterRequest>,
) -> Result<RegisterResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    // Check before hashing; the hash of an empty password is not empty.
    if req.password.is_empty() {
        return Err(HearthError::Validation(ValidationError::EmptyPassword).into());
    }
    let password_hash = auth::hash_password(&req.password)?;
    let created = state
        .user_service
        .register(NewUser {
            username: req.username,
            password_hash,
            email: req.email,
        })
        .await?;
    Ok(RegisterResponse::Created(Json(UserProfile {
        id: created.id,
        username: created.username,
        email: created.email,
    })))
}

/// `POST /api/login`
pub async fn login<UR, RR, HR, DR, TR>(
    State(state): State<AppState<UR, RR, HR, DR, TR>>,
    Json(req): Json<LoginRequest>,
) -> Result<LoginResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    let user = match state.user_service.get_by_username(&req.username).await {
        Ok(user) => user,
        // An unknown username answers exactly as a wrong password.
        Err(HearthError::NotFound(_)) => return Err(AuthError::InvalidCredentials.into()),
        Err(err) => return Err(err.into()),
    };
    if !auth::verify_password(&req.password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }
    let token = state.auth.issue_token(&user.username)?;
    Ok(LoginResponse::Ok(Json(TokenBody { token })))
}
