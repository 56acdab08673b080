use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use db::models::user::{self, Column as UserColumn, Entity as UserEntity};
use util::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct AuthResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub admin: bool,
    pub token: String,
    pub expires_at: String,
}

impl AuthResponse {
    fn for_user(user: &user::Model) -> Self {
        let (token, expires_at) = generate_jwt(user.id, user.admin);
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            admin: user.admin,
            token,
            expires_at,
        }
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// POST /auth/register
///
/// Registers a new user and returns a token alongside the profile.
///
/// - `201 Created` on success
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` when the username or email is taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<AuthResponse>::error(
                format_validation_errors(&validation_errors),
            )),
        );
    }

    let taken = UserEntity::find()
        .filter(
            UserColumn::Username
                .eq(req.username.clone())
                .or(UserColumn::Email.eq(req.email.clone())),
        )
        .one(state.db())
        .await;
    match taken {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::<AuthResponse>::error(
                    "A user with this username or email already exists",
                )),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "registration lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthResponse>::error(
                    "An internal error occurred",
                )),
            );
        }
        Ok(None) => {}
    }

    match user::Model::create(state.db(), &req.username, &req.email, &req.password, false).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AuthResponse::for_user(&user),
                "User registered successfully",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "user creation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthResponse>::error(
                    "An internal error occurred",
                )),
            )
        }
    }
}

/// POST /auth/login
///
/// Exchanges a username and password for a token.
///
/// - `200 OK` on success
/// - `401 Unauthorized` on a bad username or password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    match user::Model::verify_credentials(state.db(), &req.username, &req.password).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                AuthResponse::for_user(&user),
                "Login successful",
            )),
        ),
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<AuthResponse>::error(
                "Invalid username or password",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "credential check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<AuthResponse>::error(
                    "An internal error occurred",
                )),
            )
        }
    }
}
