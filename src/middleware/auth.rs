//! Bearer token authentication primitives
//!
//! Provides:
//! - `AuthUser`, the identity attached to a request once the gate lets it through
//! - `AuthError`, the uniform 401 rejection
//! - `extract_bearer_token` for reading the `Authorization` header

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::StringUuid;
use crate::jwt::SessionClaims;

/// Authenticated user information resolved from a session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    /// User ID from the token's `sub` claim
    pub user_id: i64,
    pub email: String,
    /// Session the token is bound to
    pub session_id: StringUuid,
}

impl AuthUser {
    /// Create AuthUser from verified session token claims
    pub fn from_session_claims(claims: SessionClaims) -> Result<Self, AuthError> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken("Invalid user ID in token".to_string()))?;
        let session_id = claims
            .sid
            .parse()
            .map_err(|_| AuthError::InvalidToken("Invalid session ID in token".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email,
            session_id,
        })
    }
}

/// Authentication errors
#[derive(Debug, Clone)]
pub enum AuthError {
    /// No Authorization header present
    MissingToken,
    /// Invalid Authorization header format
    InvalidHeader(String),
    /// Token or its session failed verification
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::MissingToken => tracing::debug!("Missing authorization token"),
            AuthError::InvalidHeader(reason) | AuthError::InvalidToken(reason) => {
                tracing::debug!("Authentication failed: {}", reason)
            }
        }

        let body = serde_json::json!({ "message": "Unauthenticated." });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Extract and validate Bearer token from Authorization header
pub fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Invalid header encoding".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AuthError::InvalidHeader("Authorization header must use Bearer scheme".to_string())
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Axum extractor for authenticated users
///
/// Reads the identity the `require_auth` middleware stored in the request
/// extensions. Outside the gate it rejects with 401.
///
/// ```ignore
/// async fn whoami(auth: AuthUser) -> String {
///     auth.email
/// }
/// ```
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}
