//! Translation API HTTP Handler Tests

use super::{
    authed_app, delete_json, field_errors, get_json, post_json, put_json, put_raw_json,
    TestAppState, TEST_APP_URL,
};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Locale and context ids for translation fixtures
async fn seed_relations(state: &TestAppState) -> (i64, i64) {
    let locale = state.db.insert_locale("en", Some("English")).await;
    let context = state.db.insert_context("web").await;
    (locale.id, context.id)
}

fn keys(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["key"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
async fn test_list_translations_envelope() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations", &token).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    let path = format!("{}/api/translations", TEST_APP_URL);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["total"], 1);
    assert_eq!(body["last_page"], 1);
    assert_eq!(body["from"], 1);
    assert_eq!(body["to"], 1);
    assert_eq!(body["path"], path.as_str());
    assert_eq!(body["first_page_url"], format!("{}?page=1", path));
    assert_eq!(body["last_page_url"], format!("{}?page=1", path));
    assert_eq!(body["prev_page_url"], Value::Null);
    assert_eq!(body["next_page_url"], Value::Null);
    assert_eq!(
        body["links"],
        json!([
            { "url": null, "label": "&laquo; Previous", "active": false },
            { "url": format!("{}?page=1", path), "label": "1", "active": true },
            { "url": null, "label": "Next &raquo;", "active": false },
        ])
    );
}

#[tokio::test]
async fn test_list_translations_embeds_relations() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations", &token).await;

    let item = &body.unwrap()["data"][0];
    assert_eq!(item["key"], "greeting");
    assert_eq!(item["content"], "Hello");
    assert_eq!(item["locale"]["id"], item["locale_id"]);
    assert_eq!(item["locale"]["name"], "en");
    assert_eq!(item["context"]["id"], item["context_id"]);
    assert_eq!(item["context"]["name"], "web");
}

#[tokio::test]
async fn test_list_translations_empty() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations", &token).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["total"], 0);
    assert_eq!(body["from"], Value::Null);
    assert_eq!(body["to"], Value::Null);
    assert_eq!(body["last_page"], 1);
}

#[tokio::test]
async fn test_list_translations_second_page() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    for i in 1..=12 {
        state
            .db
            .insert_translation(&format!("key-{:02}", i), "text", locale_id, context_id)
            .await;
    }

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations?page=2", &token).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(keys(&body), vec!["key-11", "key-12"]);
    assert_eq!(body["current_page"], 2);
    assert_eq!(body["last_page"], 2);
    assert_eq!(body["from"], 11);
    assert_eq!(body["to"], 12);
    assert_eq!(
        body["prev_page_url"],
        format!("{}/api/translations?page=1", TEST_APP_URL)
    );
    assert_eq!(body["next_page_url"], Value::Null);
}

#[tokio::test]
async fn test_list_translations_per_page_is_capped() {
    let (_state, app, token) = authed_app().await;

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations?per_page=1000", &token).await;

    assert_eq!(body.unwrap()["per_page"], 100);
}

#[tokio::test]
async fn test_list_translations_huge_page_is_empty() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations?page=9223372036854775807", &token).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    let last_addressable = i64::MAX / 10;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["current_page"], last_addressable);
    assert_eq!(body["from"], Value::Null);
    assert_eq!(body["total"], 1);
    assert_eq!(body["next_page_url"], Value::Null);
    assert_eq!(
        body["prev_page_url"],
        format!("{}/api/translations?page={}", TEST_APP_URL, last_addressable - 1)
    );
}

#[tokio::test]
async fn test_search_huge_page_is_empty() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (status, body): (StatusCode, Option<Value>) = get_json(
        &app,
        "/api/translations-search?key=greet&per_page=100&page=9223372036854775807",
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["current_page"], i64::MAX / 100);
    assert_eq!(body["total"], 1);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_by_key() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("welcome-message", "Hi", locale_id, context_id)
        .await;
    state
        .db
        .insert_translation("farewell-message", "Bye", locale_id, context_id)
        .await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations-search?key=welcome", &token).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(keys(&body), vec!["welcome-message"]);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_search_by_content() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("morning", "Good morning", locale_id, context_id)
        .await;
    state
        .db
        .insert_translation("night", "Good night", locale_id, context_id)
        .await;

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations-search?content=morning", &token).await;

    let body = body.unwrap();
    assert_eq!(keys(&body), vec!["morning"]);
    assert_eq!(body["data"][0]["content"], "Good morning");
}

#[tokio::test]
async fn test_search_by_context_name() {
    let (state, app, token) = authed_app().await;
    let locale = state.db.insert_locale("en", None).await;
    let welcome = state.db.insert_context("Welcome").await;
    let goodbye = state.db.insert_context("Goodbye").await;
    state
        .db
        .insert_translation("hello", "Hello", locale.id, welcome.id)
        .await;
    state
        .db
        .insert_translation("bye", "Bye", locale.id, goodbye.id)
        .await;

    let (_, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations-search?context=Welc", &token).await;

    let body = body.unwrap();
    assert_eq!(keys(&body), vec!["hello"]);
    assert_eq!(body["data"][0]["context"]["name"], "Welcome");
}

#[tokio::test]
async fn test_search_filters_are_conjunctive() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("welcome-morning", "Good morning", locale_id, context_id)
        .await;
    state
        .db
        .insert_translation("welcome-night", "Good night", locale_id, context_id)
        .await;

    let (_, body): (StatusCode, Option<Value>) = get_json(
        &app,
        "/api/translations-search?key=welcome&content=night",
        &token,
    )
    .await;

    assert_eq!(keys(&body.unwrap()), vec!["welcome-night"]);
}

#[tokio::test]
async fn test_search_empty_filters_match_everything() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("a", "one", locale_id, context_id)
        .await;
    state
        .db
        .insert_translation("b", "two", locale_id, context_id)
        .await;

    let (_, body): (StatusCode, Option<Value>) = get_json(
        &app,
        "/api/translations-search?key=&content=&context=",
        &token,
    )
    .await;

    assert_eq!(keys(&body.unwrap()), vec!["a", "b"]);
}

#[tokio::test]
async fn test_search_per_page() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    for i in 1..=20 {
        state
            .db
            .insert_translation(&format!("key-{:02}", i), "text", locale_id, context_id)
            .await;
    }

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations-search?per_page=5", &token).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["per_page"], 5);
    assert_eq!(body["total"], 20);
    assert_eq!(body["last_page"], 4);
    assert_eq!(
        body["next_page_url"],
        format!("{}/api/translations-search?per_page=5&page=2", TEST_APP_URL)
    );
    // previous, pages 1-4, next
    assert_eq!(body["links"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_search_malformed_per_page_falls_back_to_default() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    for i in 1..=12 {
        state
            .db
            .insert_translation(&format!("key-{:02}", i), "text", locale_id, context_id)
            .await;
    }

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations-search?per_page=lots", &token).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_search_carries_filters_into_page_links() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    for i in 1..=3 {
        state
            .db
            .insert_translation(&format!("welcome-{}", i), "text", locale_id, context_id)
            .await;
    }

    let (_, body): (StatusCode, Option<Value>) = get_json(
        &app,
        "/api/translations-search?key=welcome&per_page=2",
        &token,
    )
    .await;

    assert_eq!(
        body.unwrap()["next_page_url"],
        format!(
            "{}/api/translations-search?key=welcome&per_page=2&page=2",
            TEST_APP_URL
        )
    );
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_translation_returns_bare_row() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/translations",
        &token,
        &json!({
            "key": "greeting",
            "content": "Hello",
            "locale_id": locale_id,
            "context_id": context_id,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert_eq!(body["key"], "greeting");
    assert_eq!(body["locale_id"], locale_id);
    assert_eq!(body["context_id"], context_id);
    assert!(body.get("locale").is_none());
    assert!(body.get("context").is_none());
}

#[tokio::test]
async fn test_create_translation_accepts_string_ids() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/translations",
        &token,
        &json!({
            "key": "greeting",
            "content": "Hello",
            "locale_id": locale_id.to_string(),
            "context_id": context_id.to_string(),
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap()["locale_id"], locale_id);
}

#[tokio::test]
async fn test_create_translation_missing_fields() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) =
        post_json(&app, "/api/translations", &token, &json!({})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body.unwrap();
    assert_eq!(field_errors(&body, "key"), vec!["The key field is required."]);
    assert_eq!(
        field_errors(&body, "content"),
        vec!["The content field is required."]
    );
    assert_eq!(
        field_errors(&body, "locale_id"),
        vec!["The locale id field is required."]
    );
    assert_eq!(
        field_errors(&body, "context_id"),
        vec!["The context id field is required."]
    );
}

#[tokio::test]
async fn test_create_translation_unknown_references() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/translations",
        &token,
        &json!({ "key": "greeting", "content": "Hello", "locale_id": 99, "context_id": 98 }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body.unwrap();
    assert_eq!(
        field_errors(&body, "locale_id"),
        vec!["The selected locale id is invalid."]
    );
    assert_eq!(
        field_errors(&body, "context_id"),
        vec!["The selected context id is invalid."]
    );
}

#[tokio::test]
async fn test_create_translation_duplicate_key() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (status, body): (StatusCode, Option<Value>) = post_json(
        &app,
        "/api/translations",
        &token,
        &json!({
            "key": "greeting",
            "content": "Hi",
            "locale_id": locale_id,
            "context_id": context_id,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        field_errors(&body.unwrap(), "key"),
        vec!["The key has already been taken."]
    );
    assert_eq!(state.db.translation_count().await, 1);
}

// ============================================================================
// Get / Update / Delete
// ============================================================================

#[tokio::test]
async fn test_get_translation() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    let translation = state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (status, body): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/translations/{}", translation.id),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["id"], translation.id);
    assert_eq!(body["content"], "Hello");
}

#[tokio::test]
async fn test_get_translation_not_found() {
    let (_state, app, token) = authed_app().await;

    let (status, body): (StatusCode, Option<Value>) =
        get_json(&app, "/api/translations/404", &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_update_translation() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    let other_context = state.db.insert_context("mobile").await;
    let translation = state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/translations/{}", translation.id),
        &token,
        &json!({
            "key": "greeting",
            "content": "Hello there",
            "locale_id": locale_id,
            "context_id": other_context.id,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["content"], "Hello there");
    assert_eq!(body["context_id"], other_context.id);
}

#[tokio::test]
async fn test_update_translation_not_found() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;

    let (status, _): (StatusCode, Option<Value>) = put_json(
        &app,
        "/api/translations/999",
        &token,
        &json!({
            "key": "greeting",
            "content": "Hello",
            "locale_id": locale_id,
            "context_id": context_id,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_translation_key_taken_by_other() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;
    let farewell = state
        .db
        .insert_translation("farewell", "Goodbye", locale_id, context_id)
        .await;

    let (status, body): (StatusCode, Option<Value>) = put_json(
        &app,
        &format!("/api/translations/{}", farewell.id),
        &token,
        &json!({
            "key": "greeting",
            "content": "Bye",
            "locale_id": locale_id,
            "context_id": context_id,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        field_errors(&body.unwrap(), "key"),
        vec!["The key has already been taken."]
    );

    let (_, body): (StatusCode, Option<Value>) = get_json(
        &app,
        &format!("/api/translations/{}", farewell.id),
        &token,
    )
    .await;
    let body = body.unwrap();
    assert_eq!(body["key"], "farewell");
    assert_eq!(body["content"], "Goodbye");
}

#[tokio::test]
async fn test_update_missing_translation_with_malformed_body_is_not_found() {
    let (_state, app, token) = authed_app().await;

    let (status, _) = put_raw_json(&app, "/api/translations/999", &token, "[1, 2").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_translation() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    let translation = state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (status, body) = delete_json(
        &app,
        &format!("/api/translations/{}", translation.id),
        &token,
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert_eq!(state.db.translation_count().await, 0);

    // The locale and context are free to go once nothing references them
    let (status, _) = delete_json(&app, &format!("/api/contexts/{}", context_id), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_translation_not_found() {
    let (state, app, token) = authed_app().await;
    let (locale_id, context_id) = seed_relations(&state).await;
    state
        .db
        .insert_translation("greeting", "Hello", locale_id, context_id)
        .await;

    let (status, bytes) = delete_json(&app, "/api/translations/999", &token).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(bytes.is_empty());
    assert_eq!(state.db.translation_count().await, 1);
}
