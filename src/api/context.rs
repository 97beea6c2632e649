//! Context API handlers

use crate::api::{parse_id, payload_for, Payload};
use crate::error::{AppError, Result};
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// List all contexts
pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let contexts = state.context_service().list().await?;
    Ok(Json(contexts))
}

/// Create context
pub async fn create<S: HasServices>(
    State(state): State<S>,
    Payload(payload): Payload,
) -> Result<impl IntoResponse> {
    let context = state.context_service().create(&payload).await?;
    Ok((StatusCode::CREATED, Json(context)))
}

/// Get context by ID
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let context = state.context_service().get(parse_id(&id)?).await?;
    Ok(Json(context))
}

/// Update context
pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: std::result::Result<Payload, AppError>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let payload = payload_for(payload, state.context_service().get(id)).await?;
    let context = state.context_service().update(id, &payload).await?;
    Ok(Json(context))
}

/// Delete context
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.context_service().delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
