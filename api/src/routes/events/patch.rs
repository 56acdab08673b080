use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use sea_orm::EntityTrait;

use crate::auth::claims::AuthUser;
use crate::auth::guards::ensure_academy_staff;
use crate::routes::common::{ok, service_error_response};
use db::models::event::Entity as EventEntity;
use services::error::ServiceError;
use services::event::{self, PatchEvent};
use util::state::AppState;

/// PATCH /events/{event_id}
///
/// Applies a partial update. Scores re-derive the outcome server-side;
/// attendance and metrics maps fan out to their per-player tables and are
/// rejected on parent rules.
///
/// - `200 OK` with the refreshed event
/// - `403 Forbidden` when the caller is not staff of the event's academy
/// - `404 Not Found` for an unknown event
/// - `422 Unprocessable Entity` on invalid fields
pub async fn patch_event(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(event_id): Path<i64>,
    Json(input): Json<PatchEvent>,
) -> Response {
    // Resolve the academy scope before touching anything.
    let academy_id = match EventEntity::find_by_id(event_id).one(state.db()).await {
        Ok(Some(row)) => row.academy_id,
        Ok(None) => return service_error_response(ServiceError::NotFound("event")),
        Err(e) => return service_error_response(ServiceError::Db(e)),
    };
    if let Err(denied) = ensure_academy_staff(state.db(), &claims, academy_id).await {
        return denied.into_response();
    }

    match event::patch(state.db(), event_id, claims.sub, input, Utc::now()).await {
        Ok(view) => ok(view, "Event updated successfully"),
        Err(e) => service_error_response(e),
    }
}
