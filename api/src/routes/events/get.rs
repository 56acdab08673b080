use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::routes::common::{ok, service_error_response};
use db::models::event::EventType;
use services::event::{self, EventView};
use services::{attendance, metrics};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub academy_id: i64,
    pub event_type: Option<EventType>,
}

#[derive(Debug, Deserialize)]
pub struct OccurrencesQuery {
    pub parent_id: i64,
    pub academy_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct AcademyScope {
    pub academy_id: i64,
}

/// One event with its per-player fan-out data, keyed by player id.
#[derive(Debug, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: EventView,
    pub attendance: HashMap<i64, db::models::attendance_record::Model>,
    pub metrics: HashMap<i64, db::models::player_metric::Model>,
}

/// GET /events?academy_id=1&event_type=training
///
/// Lists an academy's events with computed statuses. Duplicate occurrence
/// identities are collapsed before the response is built.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Response {
    match event::list(state.db(), query.academy_id, query.event_type, Utc::now()).await {
        Ok(views) => ok(views, "Events retrieved successfully"),
        Err(e) => service_error_response(e),
    }
}

/// GET /events/occurrences?parent_id=7&academy_id=1
///
/// Lists one rule's occurrences: persisted rows merged with a fresh
/// expansion, sorted by date.
pub async fn list_occurrences(
    State(state): State<AppState>,
    Query(query): Query<OccurrencesQuery>,
) -> Response {
    match event::occurrences(state.db(), query.parent_id, query.academy_id, Utc::now()).await {
        Ok(views) => ok(views, "Occurrences retrieved successfully"),
        Err(e) => service_error_response(e),
    }
}

/// GET /events/{event_id}?academy_id=1
///
/// Fetches one event together with its attendance and metrics maps.
/// Players without a record are simply absent from the maps.
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Query(scope): Query<AcademyScope>,
) -> Response {
    let row = match event::get(state.db(), event_id, scope.academy_id).await {
        Ok(row) => row,
        Err(e) => return service_error_response(e),
    };
    let view = match EventView::from_model(&row, Utc::now()) {
        Ok(view) => view,
        Err(e) => return service_error_response(e),
    };
    let attendance = match attendance::for_event(state.db(), row.id).await {
        Ok(map) => map,
        Err(e) => return service_error_response(e),
    };
    let metrics = match metrics::for_event(state.db(), row.id).await {
        Ok(map) => map,
        Err(e) => return service_error_response(e),
    };

    ok(
        EventDetail {
            event: view,
            attendance,
            metrics,
        },
        "Event retrieved successfully",
    )
}
