//! Authentication enforcement middleware for the REST API
//!
//! Protected routes run only when the bearer token verifies and the session
//! it names is still active. The resolved [`AuthUser`] is stored in the
//! request extensions for handlers.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::auth::{extract_bearer_token, AuthError, AuthUser};
use crate::error::AppError;
use crate::state::HasServices;

/// Authentication enforcement middleware
///
/// Rejects with 401 `{"message": "Unauthenticated."}` when:
/// - the Authorization header is missing or not a Bearer token
/// - the JWT signature, issuer, audience or expiry is invalid
/// - the session is unknown or revoked
pub async fn require_auth<S: HasServices>(
    State(state): State<S>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer_token(request.headers()) {
        Ok(token) => token.to_string(),
        Err(e) => return e.into_response(),
    };

    let claims = match state.auth_service().authenticate(&token).await {
        Ok(claims) => claims,
        Err(AppError::Jwt(e)) => return AuthError::InvalidToken(e.to_string()).into_response(),
        Err(AppError::Unauthorized(reason)) => {
            return AuthError::InvalidToken(reason).into_response()
        }
        Err(e) => return e.into_response(),
    };

    let user = match AuthUser::from_session_claims(claims) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}
