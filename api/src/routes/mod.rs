//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected by the appropriate access
//! control middleware:
//! - `/health` -> health check (public)
//! - `/auth` -> registration and login (public)
//! - `/academies` -> academy management and player register (authenticated;
//!   tenant creation and role grants are admin-only)
//! - `/events` -> event CRUD and occurrence expansion (authenticated)

pub mod academies;
pub mod auth;
pub mod common;
pub mod events;
pub mod health;

use axum::{middleware::from_fn, Router};
use util::state::AppState;

use crate::auth::guards::allow_authenticated;
use academies::academy_routes;
use auth::auth_routes;
use events::event_routes;
use health::health_routes;

/// Builds the complete application router.
///
/// The returned router is ready to be nested under `/api` and carries its
/// own state, so tests can drive it directly with `tower::ServiceExt`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest(
            "/academies",
            academy_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/events",
            event_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
