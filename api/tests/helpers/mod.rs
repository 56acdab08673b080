#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use serde_json::Value;

use api::auth::generate_jwt;
use api::routes::routes;
use db::models::user;
use db::test_utils::setup_test_db;
use util::config::AppConfig;
use util::state::AppState;

/// Pins the process-global config to test values. Safe to call from every
/// test; the last call wins and all tests use the same values.
pub fn setup_config() {
    unsafe {
        std::env::set_var("DATABASE_PATH", "sqlite::memory:");
        std::env::set_var("JWT_SECRET", "test-secret");
    }
    AppConfig::reset();
}

/// Fresh app over a fresh in-memory database, routes nested under `/api`
/// exactly as `main` mounts them.
pub async fn make_test_app() -> (Router, AppState) {
    setup_config();

    let db = setup_test_db().await;
    let state = AppState::new(db);
    let app = Router::new().nest("/api", routes(state.clone()));
    (app, state)
}

/// Creates a user and returns it with a ready-to-use `Authorization` value.
pub async fn auth_header_for(
    state: &AppState,
    username: &str,
    admin: bool,
) -> (user::Model, String) {
    let email = format!("{username}@test.local");
    let user = user::Model::create(state.db(), username, &email, "password123", admin)
        .await
        .expect("Failed to create user");
    let (token, _) = generate_jwt(user.id, user.admin);
    (user, format!("Bearer {token}"))
}

/// Collects a response body into JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body was not valid JSON")
}

/// Builds a JSON request with an optional `Authorization` header.
pub fn json_request(
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(value) = auth {
        builder = builder.header("Authorization", value);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

/// Builds a bodyless request with an optional `Authorization` header.
pub fn bare_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = auth {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).expect("Failed to build request")
}
