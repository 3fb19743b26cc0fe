use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use super::{ensure_access, require_user_id};
use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::{NewPomodoroSession, UserIdQuery};
use crate::sessions::SessionService;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pomodoro")
            .route("", web::post().to(log_session))
            .route("", web::get().to(get_sessions))
            .route("/summary", web::get().to(get_summary)),
    );
}

async fn log_session(
    req: HttpRequest,
    body: web::Json<NewPomodoroSession>,
    auth_service: web::Data<AuthService>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, ApiError> {
    ensure_access(&req, &auth_service, body.user_id).await?;
    sessions.log(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Pomodoro session logged" })))
}

async fn get_sessions(
    req: HttpRequest,
    query: web::Query<UserIdQuery>,
    auth_service: web::Data<AuthService>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(query.user_id)?;
    ensure_access(&req, &auth_service, user_id).await?;
    Ok(HttpResponse::Ok().json(sessions.list_for_user(user_id).await?))
}

async fn get_summary(
    req: HttpRequest,
    query: web::Query<UserIdQuery>,
    auth_service: web::Data<AuthService>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, ApiError> {
    let user_id = require_user_id(query.user_id)?;
    ensure_access(&req, &auth_service, user_id).await?;
    Ok(HttpResponse::Ok().json(sessions.summary_for_user(user_id).await?))
}
