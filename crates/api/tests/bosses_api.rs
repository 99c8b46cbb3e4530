//! Integration tests for the boss roster API.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{assert_status, body_json, delete_auth, get, post_json, post_json_auth};
use sqlx::PgPool;

fn boss_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "level": 140,
        "location": "Leafre Forest",
        "respawn_rule": "24 Hour",
    })
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_public_and_initially_empty(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/bosses").await;

    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json, serde_json::json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_returns_created_bosses(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(app.clone(), "/api/v1/bosses", boss_payload("Venatus")).await;
    assert_status(response, StatusCode::OK).await;

    let json = body_json(get(app, "/api/v1/bosses").await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Venatus");
    assert_eq!(json[0]["level"], 140);
    assert_eq!(json[0]["last_killed"], serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn mutations_require_the_dashboard_password(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app.clone(), "/api/v1/bosses", boss_payload("Venatus")).await;
    let json = assert_status(response, StatusCode::UNAUTHORIZED).await;
    assert_matches!(json["code"].as_str(), Some("UNAUTHORIZED"));

    let response = post_json(
        app.clone(),
        "/api/v1/bosses/Venatus/kill",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Nothing was written.
    let json = body_json(get(app, "/api/v1/bosses").await).await;
    assert_eq!(json, serde_json::json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_password_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/api/v1/bosses")
        .header("content-type", "application/json")
        .header("authorization", "Bearer not-the-password")
        .body(axum::body::Body::from(boss_payload("Venatus").to_string()))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Upsert validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn upsert_rejects_blank_name(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/bosses",
        serde_json::json!({ "name": "   " }),
    )
    .await;

    let json = assert_status(response, StatusCode::BAD_REQUEST).await;
    assert_matches!(json["code"].as_str(), Some("VALIDATION_ERROR"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn upsert_twice_updates_in_place(pool: PgPool) {
    let app = common::build_test_app(pool);

    post_json_auth(app.clone(), "/api/v1/bosses", boss_payload("Venatus")).await;
    let response = post_json_auth(
        app.clone(),
        "/api/v1/bosses",
        serde_json::json!({ "name": "Venatus", "level": 150 }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["level"], 150);
    // Unspecified fields keep their previous values.
    assert_eq!(json["location"], "Leafre Forest");

    let list = body_json(get(app, "/api/v1/bosses").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Kill / unkill
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn kill_defaults_to_now_and_clamps_future_times(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json_auth(app.clone(), "/api/v1/bosses", boss_payload("Venatus")).await;

    // A kill dated two hours into the future must be clamped.
    let future = Utc::now() + Duration::hours(2);
    let response = post_json_auth(
        app.clone(),
        "/api/v1/bosses/Venatus/kill",
        serde_json::json!({ "killed_at": future }),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;

    let stored: chrono::DateTime<Utc> =
        serde_json::from_value(json["last_killed"].clone()).unwrap();
    assert!(stored <= Utc::now());
    assert_eq!(json["notified_ten_minute"], false);
    assert_eq!(json["notified_on_spawn"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn kill_unknown_boss_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/bosses/ghost/kill",
        serde_json::json!({}),
    )
    .await;

    let json = assert_status(response, StatusCode::NOT_FOUND).await;
    assert_matches!(json["code"].as_str(), Some("NOT_FOUND"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unkill_clears_the_recorded_kill(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json_auth(app.clone(), "/api/v1/bosses", boss_payload("Venatus")).await;
    post_json_auth(
        app.clone(),
        "/api/v1/bosses/Venatus/kill",
        serde_json::json!({}),
    )
    .await;

    let response = post_json_auth(
        app,
        "/api/v1/bosses/Venatus/unkill",
        serde_json::json!({}),
    )
    .await;
    let json = assert_status(response, StatusCode::OK).await;
    assert_eq!(json["last_killed"], serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_the_boss(pool: PgPool) {
    let app = common::build_test_app(pool);
    post_json_auth(app.clone(), "/api/v1/bosses", boss_payload("Venatus")).await;

    let response = delete_auth(app.clone(), "/api/v1/bosses/Venatus").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(app, "/api/v1/bosses").await).await;
    assert_eq!(json, serde_json::json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_unknown_boss_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = delete_auth(app, "/api/v1/bosses/ghost").await;
    let json = assert_status(response, StatusCode::NOT_FOUND).await;
    assert_matches!(json["code"].as_str(), Some("NOT_FOUND"));
}
