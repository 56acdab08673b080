//! Authentication endpoints: registration and login.

pub mod post;

use axum::{routing::post as http_post, Router};
use util::state::AppState;

use post::{login, register};

/// Builds the `/auth` route group.
///
/// - `POST /auth/register` -> create an account and receive a token
/// - `POST /auth/login` -> exchange credentials for a token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", http_post(register))
        .route("/login", http_post(login))
}
