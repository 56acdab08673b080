use axum::{
    extract::{Path, State},
    response::Response,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::routes::common::{ok, service_error_response};
use db::models::academy::{Column as AcademyColumn, Entity as AcademyEntity};
use db::models::player::{Column as PlayerColumn, Entity as PlayerEntity};
use services::error::ServiceError;
use util::state::AppState;

/// GET /academies
///
/// Lists all academies, ordered by name.
pub async fn list_academies(State(state): State<AppState>) -> Response {
    match AcademyEntity::find()
        .order_by_asc(AcademyColumn::Name)
        .all(state.db())
        .await
    {
        Ok(rows) => ok(rows, "Academies retrieved successfully"),
        Err(e) => service_error_response(ServiceError::Db(e)),
    }
}

/// GET /academies/{academy_id}/players
///
/// Lists the academy's player register, ordered by name.
pub async fn list_players(
    State(state): State<AppState>,
    Path(academy_id): Path<i64>,
) -> Response {
    match PlayerEntity::find()
        .filter(PlayerColumn::AcademyId.eq(academy_id))
        .order_by_asc(PlayerColumn::FullName)
        .all(state.db())
        .await
    {
        Ok(rows) => ok(rows, "Players retrieved successfully"),
        Err(e) => service_error_response(ServiceError::Db(e)),
    }
}
