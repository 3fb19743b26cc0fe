use actix_web::{web, HttpRequest, HttpResponse};
use log::warn;

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::{Role, User};

pub mod pomodoro_routes;
pub mod quiz_routes;
pub mod resource_routes;
pub mod study_group_routes;
pub mod todo_routes;
pub mod user_routes;

/// Mounts every route under `/api`, plus the root banner.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(banner)).service(
        web::scope("/api")
            .configure(user_routes::config)
            .configure(todo_routes::config)
            .configure(pomodoro_routes::config)
            .configure(resource_routes::config)
            .configure(study_group_routes::config)
            .configure(quiz_routes::config),
    );
}

async fn banner() -> HttpResponse {
    HttpResponse::Ok().body("StudySync backend running.")
}

/// Resolves the bearer token when one is sent. No header means an anonymous
/// request; a header with a bad token is rejected.
pub(crate) async fn bearer_user(
    req: &HttpRequest,
    auth_service: &AuthService,
) -> Result<Option<User>, ApiError> {
    let Some(header) = req.headers().get("Authorization") else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Malformed authorization header".to_string()))?;

    auth_service
        .validate_token(token)
        .await
        .map(Some)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))
}

/// Authenticated callers may only touch their own rows; admins are exempt.
pub(crate) async fn ensure_access(
    req: &HttpRequest,
    auth_service: &AuthService,
    owner_id: i64,
) -> Result<(), ApiError> {
    match bearer_user(req, auth_service).await? {
        Some(user) => authorize(&user, owner_id),
        None => Ok(()),
    }
}

pub(crate) fn authorize(user: &User, owner_id: i64) -> Result<(), ApiError> {
    if user.id != owner_id && user.role != Role::Admin {
        warn!("User {} denied access to data of user {}", user.id, owner_id);
        return Err(ApiError::Forbidden("Not allowed to access another user's data".to_string()));
    }
    Ok(())
}

pub(crate) fn require_user_id(user_id: Option<i64>) -> Result<i64, ApiError> {
    user_id.ok_or_else(|| ApiError::validation("User ID is required"))
}
