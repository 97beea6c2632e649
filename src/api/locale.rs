//! Locale API handlers

use crate::api::{parse_id, payload_for, Payload};
use crate::error::{AppError, Result};
use crate::service::locale::LOCALE_NOT_FOUND;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// List all locales
pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let locales = state.locale_service().list().await?;
    Ok(Json(locales))
}

/// Create locale
pub async fn create<S: HasServices>(
    State(state): State<S>,
    Payload(payload): Payload,
) -> Result<impl IntoResponse> {
    let locale = state.locale_service().create(&payload).await?;
    Ok((StatusCode::CREATED, Json(locale)))
}

/// Get locale by ID
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let locale = state.locale_service().get(parse_id(&id)?).await?;
    Ok(Json(locale))
}

/// Update locale
pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: std::result::Result<Payload, AppError>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)
        .map_err(|_| AppError::NotFoundMessage(LOCALE_NOT_FOUND.to_string()))?;
    let payload = payload_for(payload, state.locale_service().get_for_update(id)).await?;
    let locale = state.locale_service().update(id, &payload).await?;
    Ok(Json(locale))
}

/// Delete locale
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.locale_service().delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
