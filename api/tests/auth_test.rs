mod helpers;

use helpers::{bare_request, body_json, json_request, make_test_app};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

#[tokio::test]
#[serial]
async fn register_returns_token_and_profile() {
    let (app, _state) = make_test_app().await;

    let body = json!({
        "username": "coach_anna",
        "email": "anna@test.local",
        "password": "password123"
    });
    let response = app
        .oneshot(json_request("POST", "/api/auth/register", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["username"], "coach_anna");
    assert_eq!(json["data"]["admin"], false);
    assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
#[serial]
async fn register_rejects_short_password() {
    let (app, _state) = make_test_app().await;

    let body = json!({
        "username": "coach_anna",
        "email": "anna@test.local",
        "password": "short"
    });
    let response = app
        .oneshot(json_request("POST", "/api/auth/register", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
#[serial]
async fn register_rejects_duplicate_username() {
    let (app, _state) = make_test_app().await;

    let body = json!({
        "username": "coach_anna",
        "email": "anna@test.local",
        "password": "password123"
    });
    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", None, &body))
        .await
        .unwrap();
    assert_eq!(first.status(), 201);

    let second = app
        .oneshot(json_request("POST", "/api/auth/register", None, &body))
        .await
        .unwrap();
    assert_eq!(second.status(), 409);
}

#[tokio::test]
#[serial]
async fn login_round_trips_registered_credentials() {
    let (app, _state) = make_test_app().await;

    let register = json!({
        "username": "coach_anna",
        "email": "anna@test.local",
        "password": "password123"
    });
    app.clone()
        .oneshot(json_request("POST", "/api/auth/register", None, &register))
        .await
        .unwrap();

    let login = json!({ "username": "coach_anna", "password": "password123" });
    let response = app
        .oneshot(json_request("POST", "/api/auth/login", None, &login))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
#[serial]
async fn login_rejects_a_wrong_password() {
    let (app, _state) = make_test_app().await;

    let register = json!({
        "username": "coach_anna",
        "email": "anna@test.local",
        "password": "password123"
    });
    app.clone()
        .oneshot(json_request("POST", "/api/auth/register", None, &register))
        .await
        .unwrap();

    let login = json!({ "username": "coach_anna", "password": "wrong-password" });
    let response = app
        .oneshot(json_request("POST", "/api/auth/login", None, &login))
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
#[serial]
async fn protected_routes_require_a_token() {
    let (app, _state) = make_test_app().await;

    let response = app
        .oneshot(bare_request("GET", "/api/events?academy_id=1", None))
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}
