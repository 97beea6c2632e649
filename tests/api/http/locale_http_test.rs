//! Locale API HTTP Handler Tests

use super::{authed_app, delete_json, field_errors, get_json, post_json, put_json, put_raw_json};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

// ============================================================================
// List / Create
// ============================================================================

#[tokio::test]
async fn test_list_locales() {
    let (state, app, token) = authed_app().await;
    state.db.insert_locale("en", Some("English")).await;
    state.db.insert_locale("fr", None).await;

    let (status, body): (StatusCode, Option<Vec<Value>>) =
        get_json(&app, "/api/locales", &token).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["name"], "en");
    assert_eq!(body[0]["description"], "English");
    assert_eq!(body[1]["description"], Value::Null);
}

#[tokio::test]
async fn test_create_locale_with_description() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/locales",
        &token,
        &json!({ "name": "en", "description": "English" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert_eq!(body["name"], "en");
    assert_eq!(body["description"], "English");
}

#[tokio::test]
async fn test_create_locale_description_is_optional() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/locales",
        &token,
        &json!({ "name": "de", "description": null }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["description"], Value::Null);
}

#[tokio::test]
async fn test_create_locale_reports_every_field() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/locales",
        &token,
        &json!({ "description": 7 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body.unwrap();
    assert_eq!(field_errors(&body, "name"), vec!["The name field is required."]);
    assert_eq!(
        field_errors(&body, "description"),
        vec!["The description field must be a string."]
    );
}

#[tokio::test]
async fn test_create_locale_duplicate_name() {
    let (state, app, token) = authed_app().await;
    state.db.insert_locale("en", None).await;

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/locales", &token, &json!({ "name": "en" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        field_errors(&body.unwrap(), "name"),
        vec!["The name has already been taken."]
    );
}

// ============================================================================
// Get / Update
// ============================================================================

#[tokio::test]
async fn test_get_locale() {
    let (state, app, token) = authed_app().await;
    let locale = state.db.insert_locale("en", Some("English")).await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/api/locales/{}", locale.id), &token).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap()["name"], "en");
}

#[tokio::test]
async fn test_get_locale_not_found_has_empty_body() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/locales/999", &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_update_locale() {
    let (state, app, token) = authed_app().await;
    let locale = state.db.insert_locale("en", None).await;

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/locales/{}", locale.id),
        &token,
        &json!({ "name": "en-GB", "description": "British English" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["id"], locale.id);
    assert_eq!(body["name"], "en-GB");
    assert_eq!(body["description"], "British English");
}

#[tokio::test]
async fn test_update_locale_not_found_has_message() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) =
        put_json(&app, "/api/locales/999", &token, &json!({ "name": "xx" })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap(), json!({ "errors": "Locale not found" }));
}

#[tokio::test]
async fn test_update_locale_non_integer_id_has_message() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) =
        put_json(&app, "/api/locales/en", &token, &json!({ "name": "xx" })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap(), json!({ "errors": "Locale not found" }));
}

#[tokio::test]
async fn test_update_missing_locale_with_malformed_body_has_message() {
    let (_state, app, token) = authed_app().await;

    let (status, bytes) = put_raw_json(&app, "/api/locales/999", &token, "not json").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "errors": "Locale not found" }));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_locale() {
    let (state, app, token) = authed_app().await;
    let locale = state.db.insert_locale("fr", None).await;

    let (status, _) = delete_json(&app, &format!("/api/locales/{}", locale.id), &token).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _): (StatusCode, Option<Value>) =
        get_json(&app, &format!("/api/locales/{}", locale.id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_locale_not_found() {
    let (state, app, token) = authed_app().await;
    state.db.insert_locale("en", None).await;

    let (status, bytes) = delete_json(&app, "/api/locales/999", &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(bytes.is_empty());
    let (_, body): (StatusCode, Option<Vec<Value>>) = get_json(&app, "/api/locales", &token).await;
    assert_eq!(body.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_referenced_locale_conflicts() {
    let (state, app, token) = authed_app().await;
    let locale = state.db.insert_locale("en", None).await;
    let context = state.db.insert_context("web").await;
    state
        .db
        .insert_translation("greeting", "Hello", locale.id, context.id)
        .await;

    let (status, bytes) = delete_json(&app, &format!("/api/locales/{}", locale.id), &token).await;

    assert_eq!(status, StatusCode::CONFLICT);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({ "errors": "Locale is still referenced by translations" })
    );
}
