//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use hearth_domain::error::HearthError;

use crate::auth::AuthError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps domain and request-layer errors to an HTTP response with the
/// appropriate status code.
pub enum ApiError {
    /// An error propagated from the application core.
    Domain(HearthError),
    /// An authentication or authorization failure.
    Auth(AuthError),
}

impl From<HearthError> for ApiError {
    fn from(err: HearthError) -> Self {
        Self::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Domain(err) => match err {
                HearthError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
                HearthError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
                HearthError::MalformedPayload(err) => (StatusCode::BAD_REQUEST, err.to_string()),
                HearthError::Storage(err)
                | HearthError::Publish(err)
                | HearthError::Transport(err) => {
                    tracing::error!(error = %err, "internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::MissingToken
                | AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, err.to_string()),
                AuthError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
                AuthError::Hash(source) => {
                    tracing::error!(error = %source, "password hashing failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
                AuthError::Token(source) => {
                    tracing::error!(error = %source, "token issuance failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
