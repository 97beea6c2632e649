//! Translation API handlers

use crate::api::{parse_id, payload_for, LengthAwarePaginator, ListParams, Payload};
use crate::domain::{TranslationFilter, TranslationWithRelations};
use crate::error::{AppError, Result};
use crate::service::translation::TranslationPage;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

const LIST_PATH: &str = "/api/translations";
const SEARCH_PATH: &str = "/api/translations-search";

fn paginate<S: HasServices>(
    state: &S,
    path: &str,
    page: TranslationPage,
    params: &ListParams,
) -> Json<LengthAwarePaginator<TranslationWithRelations>> {
    let url = format!("{}{}", state.config().app_url, path);
    Json(LengthAwarePaginator::new(
        page.items,
        page.total,
        page.page,
        url,
        params,
    ))
}

/// List translations, paginated, with locale and context embedded
pub async fn list<S: HasServices>(
    State(state): State<S>,
    params: ListParams,
) -> Result<impl IntoResponse> {
    let page = state
        .translation_service()
        .list(params.page_request())
        .await?;
    Ok(paginate(&state, LIST_PATH, page, &params))
}

/// Search translations by key, content or context name
pub async fn search<S: HasServices>(
    State(state): State<S>,
    params: ListParams,
) -> Result<impl IntoResponse> {
    let filter = TranslationFilter::new(
        params.get("key"),
        params.get("content"),
        params.get("context"),
    );
    let page = state
        .translation_service()
        .search(&filter, params.page_request())
        .await?;
    Ok(paginate(&state, SEARCH_PATH, page, &params))
}

/// Create translation
pub async fn create<S: HasServices>(
    State(state): State<S>,
    Payload(payload): Payload,
) -> Result<impl IntoResponse> {
    let translation = state.translation_service().create(&payload).await?;
    Ok((StatusCode::CREATED, Json(translation)))
}

/// Get translation by ID
pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let translation = state.translation_service().get(parse_id(&id)?).await?;
    Ok(Json(translation))
}

/// Update translation
pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    payload: std::result::Result<Payload, AppError>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let payload = payload_for(payload, state.translation_service().get(id)).await?;
    let translation = state.translation_service().update(id, &payload).await?;
    Ok(Json(translation))
}

/// Delete translation
pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.translation_service().delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
