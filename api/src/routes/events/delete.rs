use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension,
};
use sea_orm::EntityTrait;

use crate::auth::claims::AuthUser;
use crate::auth::guards::{ensure_academy_staff, Empty};
use crate::routes::common::{ok, service_error_response};
use db::models::event::Entity as EventEntity;
use services::error::ServiceError;
use services::event;
use util::state::AppState;

/// DELETE /events/{event_id}
///
/// Deletes an event. Deleting a parent rule removes its persisted
/// occurrences in the same request, so no orphan rows remain.
///
/// - `200 OK` on success
/// - `403 Forbidden` when the caller is not staff of the event's academy
/// - `404 Not Found` for an unknown event
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(event_id): Path<i64>,
) -> Response {
    let academy_id = match EventEntity::find_by_id(event_id).one(state.db()).await {
        Ok(Some(row)) => row.academy_id,
        Ok(None) => return service_error_response(ServiceError::NotFound("event")),
        Err(e) => return service_error_response(ServiceError::Db(e)),
    };
    if let Err(denied) = ensure_academy_staff(state.db(), &claims, academy_id).await {
        return denied.into_response();
    }

    match event::delete(state.db(), event_id, academy_id).await {
        Ok(()) => ok(Empty, "Event deleted successfully"),
        Err(e) => service_error_response(e),
    }
}
