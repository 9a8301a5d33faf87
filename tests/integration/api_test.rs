//! Integration tests for the HTTP API.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestApp;

#[tokio::test]
async fn test_root() {
    let app = TestApp::new();
    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"message": "Server is running!"}));
}

#[tokio::test]
async fn test_me_offline_before_ready() {
    let app = TestApp::new();
    let response = app.get("/me").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"client": "offline", "user": null}));
}

#[tokio::test]
async fn test_me_online_after_ready() {
    let app = TestApp::new();
    app.connect(json!([]));

    let response = app.get("/me").await;
    assert_eq!(response.body, json!({"client": "online", "user": "me#1234"}));

    // Connection lost: the account is still known.
    app.gateway.set_ready(false);
    let response = app.get("/me").await;
    assert_eq!(response.body, json!({"client": "offline", "user": "me#1234"}));
}

#[tokio::test]
async fn test_activity_not_ready() {
    let app = TestApp::new();
    let response = app.get("/activity").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"activities": [], "last_updated_at": 0}));
}

#[tokio::test]
async fn test_activity_waits_for_supplemental_presences() {
    let app = TestApp::new();
    app.identify();

    let response = app.get("/me").await;
    assert_eq!(response.body, json!({"client": "offline", "user": "me#1234"}));

    // Presences are still missing, so nothing is cached.
    let response = app.get("/activity").await;
    assert_eq!(response.body, json!({"activities": [], "last_updated_at": 0}));

    app.supplemental(json!([{"name": "Chess", "type": 0}]));
    app.clock.set_epoch_seconds(1020);

    let response = app.get("/me").await;
    assert_eq!(response.body["client"], "online");

    let response = app.get("/activity").await;
    assert_eq!(response.body["last_updated_at"], 1020);
    assert_eq!(response.body["activities"][0]["name"], "Chess");
}

#[tokio::test]
async fn test_activity_refresh_and_cache() {
    let app = TestApp::new();
    app.connect(json!([
        {"name": "Chess", "type": 0, "application_id": 383226320970055681u64}
    ]));

    let response = app.get("/activity").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["last_updated_at"], 1000);
    assert_eq!(response.body["activities"][0]["name"], "Chess");
    assert_eq!(
        response.body["activities"][0]["application_id"],
        "383226320970055681"
    );

    // Within the TTL the old snapshot is served.
    app.presence(json!([]));
    app.clock.set_epoch_seconds(1029);
    let response = app.get("/activity").await;
    assert_eq!(response.body["activities"].as_array().map(Vec::len), Some(1));
    assert_eq!(response.body["last_updated_at"], 1000);

    // At the TTL boundary it refreshes.
    app.clock.set_epoch_seconds(1030);
    let response = app.get("/activity").await;
    assert_eq!(response.body, json!({"activities": [], "last_updated_at": 1030}));
}

#[tokio::test]
async fn test_unknown_path() {
    let app = TestApp::new();
    let response = app.get("/nope").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({"detail": "Not Found"}));
}

#[tokio::test]
async fn test_wrong_method() {
    let app = TestApp::new();
    let response = app.request("POST", "/activity").await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.body, json!({"detail": "Method Not Allowed"}));
}
