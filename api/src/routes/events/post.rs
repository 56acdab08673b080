use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::claims::AuthUser;
use crate::auth::guards::ensure_academy_staff;
use crate::routes::common::{created, service_error_response};
use crate::routes::events::view_of;
use services::event::{self, CreateEvent};
use util::state::AppState;

/// POST /events
///
/// Creates a one-off event, a recurring rule, or (when `parent_id` is set)
/// a persisted occurrence of an existing rule. Recurring rules are rejected
/// up front when their weekday set matches no date in range.
///
/// - `201 Created` with the stored event
/// - `403 Forbidden` when the caller is not staff of the academy
/// - `422 Unprocessable Entity` on a bad window, weekday, or empty series
pub async fn create_event(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(input): Json<CreateEvent>,
) -> Response {
    if let Err(denied) = ensure_academy_staff(state.db(), &claims, input.academy_id).await {
        return denied.into_response();
    }

    let now = Utc::now();
    match event::create(state.db(), input, claims.sub, now).await {
        Ok(row) => view_of(&row, now, |view| {
            created(view, "Event created successfully")
        }),
        Err(e) => service_error_response(e),
    }
}
