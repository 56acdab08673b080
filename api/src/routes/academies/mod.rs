//! Academy endpoints: tenant management, staff role assignment, and the
//! player register.

pub mod get;
pub mod post;

use axum::{
    middleware::from_fn,
    routing::{get as http_get, post as http_post},
    Router,
};
use util::state::AppState;

use crate::auth::guards::allow_admin;
use get::{list_academies, list_players};
use post::{assign_role, create_academy, create_player};

/// Builds the `/academies` route group.
///
/// - `GET /academies` -> list academies (authenticated)
/// - `POST /academies` -> create an academy (admin)
/// - `POST /academies/{academy_id}/roles` -> assign coach/coordinator (admin)
/// - `GET /academies/{academy_id}/players` -> player register (authenticated)
/// - `POST /academies/{academy_id}/players` -> register a player (staff)
pub fn academy_routes() -> Router<AppState> {
    let admin_only: Router<AppState> = Router::new()
        .route("/", http_post(create_academy))
        .route("/{academy_id}/roles", http_post(assign_role))
        .route_layer(from_fn(allow_admin));

    Router::new()
        .route("/", http_get(list_academies))
        .route("/{academy_id}/players", http_get(list_players))
        .route("/{academy_id}/players", http_post(create_player))
        .merge(admin_only)
}
