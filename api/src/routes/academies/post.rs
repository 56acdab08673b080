use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use sea_orm::EntityTrait;
use serde::Deserialize;
use validator::Validate;

use crate::auth::claims::AuthUser;
use crate::auth::guards::{ensure_academy_staff, Empty};
use crate::response::ApiResponse;
use crate::routes::common::{created, service_error_response};
use db::models::academy_role::{self, Role};
use db::models::user::Entity as UserEntity;
use db::models::{academy, player};
use services::error::ServiceError;
use util::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAcademyRequest {
    #[validate(length(min = 2, message = "Academy name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 2, message = "Academy slug must be at least 2 characters"))]
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub user_id: i64,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1, message = "Player name must not be empty"))]
    pub full_name: String,
    pub squad: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<i32>,
}

/// POST /academies
///
/// Creates a new academy. Admin only.
pub async fn create_academy(
    State(state): State<AppState>,
    Json(req): Json<CreateAcademyRequest>,
) -> Response {
    if let Err(e) = req.validate() {
        return service_error_response(ServiceError::validation(e.to_string()));
    }
    match academy::Model::create(state.db(), &req.name, &req.slug).await {
        Ok(row) => created(row, "Academy created successfully"),
        Err(e) => service_error_response(ServiceError::Db(e)),
    }
}

/// POST /academies/{academy_id}/roles
///
/// Grants a user a coach or coordinator role in the academy. Admin only.
pub async fn assign_role(
    State(state): State<AppState>,
    Path(academy_id): Path<i64>,
    Json(req): Json<AssignRoleRequest>,
) -> Response {
    // Both sides of the assignment must exist.
    match UserEntity::find_by_id(req.user_id).one(state.db()).await {
        Ok(Some(_)) => {}
        Ok(None) => return service_error_response(ServiceError::NotFound("user")),
        Err(e) => return service_error_response(ServiceError::Db(e)),
    }
    match academy::Entity::find_by_id(academy_id).one(state.db()).await {
        Ok(Some(_)) => {}
        Ok(None) => return service_error_response(ServiceError::NotFound("academy")),
        Err(e) => return service_error_response(ServiceError::Db(e)),
    }

    match academy_role::Model::assign(state.db(), req.user_id, academy_id, req.role).await {
        Ok(row) => created(row, "Role assigned successfully"),
        Err(e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<Empty>::error(format!(
                "Could not assign role: {e}"
            ))),
        )
            .into_response(),
    }
}

/// POST /academies/{academy_id}/players
///
/// Registers a player in the academy. Requires coach or coordinator.
pub async fn create_player(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(academy_id): Path<i64>,
    Json(req): Json<CreatePlayerRequest>,
) -> Response {
    if let Err(denied) = ensure_academy_staff(state.db(), &claims, academy_id).await {
        return denied.into_response();
    }
    if let Err(e) = req.validate() {
        return service_error_response(ServiceError::validation(e.to_string()));
    }

    match player::Model::create(
        state.db(),
        academy_id,
        &req.full_name,
        req.squad.as_deref(),
        req.position.as_deref(),
        req.jersey_number,
    )
    .await
    {
        Ok(row) => created(row, "Player registered successfully"),
        Err(e) => service_error_response(ServiceError::Db(e)),
    }
}
