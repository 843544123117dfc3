//! Credential hashing and bearer-token authentication.
//!
//! Registration hashes the clear-text password with bcrypt; login verifies
//! it and answers with an HS256 JWT whose subject is the username.
//! Protected handlers take the [`AuthUser`] extractor, which checks the
//! bearer token and resolves its subject back to a [`User`].

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use hearth_app::ports::{
    DeviceRepository, HomeRepository, RoleRepository, TelemetryRepository, UserRepository,
};
use hearth_domain::error::HearthError;
use hearth_domain::time;
use hearth_domain::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Errors raised by credential handling and token checks.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The username/password pair did not match an account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No usable `Authorization: Bearer …` header on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// The token failed verification or its subject no longer resolves.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The caller lacks the role the endpoint requires.
    #[error("owner role required")]
    Forbidden,

    /// bcrypt could not produce a hash.
    #[error("failed to hash password")]
    Hash(#[source] bcrypt::BcryptError),

    /// Token signing failed.
    #[error("failed to issue token")]
    Token(#[source] jsonwebtoken::errors::Error),
}

/// Hash a clear-text password for storage.
///
/// # Errors
///
/// Returns [`AuthError::Hash`] when bcrypt fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(AuthError::Hash)
}

/// Whether `password` matches the stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch, keeping login failures
/// indistinguishable from one another.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Token signing/verification keys plus the token lifetime.
pub struct AuthConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl AuthConfig {
    /// Build keys from the shared secret; tokens expire after `token_ttl`.
    #[must_use]
    pub fn new(secret: &str, token_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: i64::try_from(token_ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Issue a signed token whose subject is `username`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Token`] when signing fails.
    pub fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        let claims = Claims {
            sub: username.to_string(),
            exp: time::now().timestamp().saturating_add(self.ttl_secs),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::Token)
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for a bad signature, a garbled
    /// token, or an expired one.
    pub fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// The authenticated account, resolved from the `Authorization` header.
pub struct AuthUser(pub User);

impl<UR, RR, HR, DR, TR> FromRequestParts<AppState<UR, RR, HR, DR, TR>> for AuthUser
where
    UR: UserRepository + Send + Sync + 'static,
    RR: RoleRepository + Send + Sync + 'static,
    HR: HomeRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: TelemetryRepository + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<UR, RR, HR, DR, TR>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;
        let username = state.auth.verify_token(token)?;
        match state.user_service.get_by_username(&username).await {
            Ok(user) => Ok(Self(user)),
            // The subject no longer names an account; answer exactly as
            // for a forged token.
            Err(HearthError::NotFound(_)) => Err(AuthError::InvalidToken.into()),
            Err(err) => Err(err.into()),
        }
    }
}
