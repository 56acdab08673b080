//! Event endpoints: listing, occurrence expansion, creation, partial
//! updates, and deletion.
//!
//! All routes require authentication; mutations additionally require the
//! caller to be coach or coordinator of the event's academy.

pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

use axum::{
    response::Response,
    routing::{delete as http_delete, get as http_get, patch as http_patch, post as http_post},
    Router,
};
use chrono::{DateTime, Utc};
use util::state::AppState;

use crate::routes::common::service_error_response;
use db::models::event::Model as EventModel;
use services::event::EventView;

use delete::delete_event;
use get::{get_event, list_events, list_occurrences};
use patch::patch_event;
use post::create_event;

/// Builds the `/events` route group.
///
/// - `GET /events` -> deduplicated listing for one academy
/// - `GET /events/occurrences` -> persisted plus expanded dates of one rule
/// - `GET /events/{event_id}` -> one event with attendance and metrics
/// - `POST /events` -> create a one-off, rule, or occurrence
/// - `PATCH /events/{event_id}` -> partial update with fan-out maps
/// - `DELETE /events/{event_id}` -> delete, cascading over occurrences
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", http_get(list_events))
        .route("/", http_post(create_event))
        .route("/occurrences", http_get(list_occurrences))
        .route("/{event_id}", http_get(get_event))
        .route("/{event_id}", http_patch(patch_event))
        .route("/{event_id}", http_delete(delete_event))
}

/// Builds the response for a freshly stored row, falling back to an error
/// envelope when its stored times fail to parse.
pub(crate) fn view_of(
    row: &EventModel,
    now: DateTime<Utc>,
    respond: impl FnOnce(EventView) -> Response,
) -> Response {
    match EventView::from_model(row, now) {
        Ok(view) => respond(view),
        Err(e) => service_error_response(e),
    }
}
