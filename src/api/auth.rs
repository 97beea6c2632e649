//! Authentication API handlers

use crate::api::Payload;
use crate::domain::LoginInput;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// Exchange email and password for a bearer token
pub async fn login<S: HasServices>(
    State(state): State<S>,
    Payload(payload): Payload,
) -> Result<impl IntoResponse> {
    let input = LoginInput::from_payload(&payload);
    let response = state.auth_service().login(input).await?;
    Ok(Json(response))
}

/// Revoke the session behind the caller's token
pub async fn logout<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    state.auth_service().logout(auth.session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
