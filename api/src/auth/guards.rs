use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use sea_orm::DatabaseConnection;

use crate::auth::claims::{AuthUser, Claims};
use crate::response::ApiResponse;
use db::models::user;

#[derive(serde::Serialize, Default)]
pub struct Empty;

/// Extracts and validates the user from the request, re-inserting it into
/// the request extensions for downstream handlers.
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;
    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !user.0.admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin access required")),
        ));
    }

    Ok(next.run(req).await)
}

/// Checks that the caller is coach or coordinator of `academy_id` (admins
/// bypass). Used inside handlers, where the academy scope comes from the
/// body or the event row rather than the path.
pub async fn ensure_academy_staff(
    db: &DatabaseConnection,
    claims: &Claims,
    academy_id: i64,
) -> Result<(), (StatusCode, Json<ApiResponse<Empty>>)> {
    if claims.admin {
        return Ok(());
    }
    match user::Model::is_academy_staff(db, claims.sub, academy_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(
                "You are not a coach or coordinator of this academy",
            )),
        )),
        Err(e) => {
            // A failed role lookup is treated as no role.
            tracing::warn!(error = %e, user_id = claims.sub, academy_id, "role check failed");
            Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error(
                    "You are not a coach or coordinator of this academy",
                )),
            ))
        }
    }
}
