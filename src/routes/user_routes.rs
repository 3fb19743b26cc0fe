use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

use super::bearer_user;
use crate::auth::AuthService;
use crate::error::ApiError;
use crate::models::{LoginCredentials, PublicUser, RegisterCredentials};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(get_current_user)),
    );
}

async fn register(
    auth_service: web::Data<AuthService>,
    credentials: web::Json<RegisterCredentials>,
) -> Result<HttpResponse, ApiError> {
    info!("Received registration request for: {}", credentials.email);
    match auth_service.register(credentials.into_inner()).await {
        Ok(user) => {
            info!("Registration successful for: {}", user.email);
            Ok(HttpResponse::Created().json(json!({
                "message": "User registered successfully."
            })))
        }
        Err(e) => {
            error!("Registration failed: {}", e);
            Err(e)
        }
    }
}

async fn login(
    auth_service: web::Data<AuthService>,
    credentials: web::Json<LoginCredentials>,
) -> Result<HttpResponse, ApiError> {
    info!("Received login request for: {}", credentials.email);
    let response = auth_service.login(credentials.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn get_current_user(
    req: HttpRequest,
    auth_service: web::Data<AuthService>,
) -> Result<HttpResponse, ApiError> {
    let user = bearer_user(&req, &auth_service)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("No authorization token provided".to_string()))?;
    Ok(HttpResponse::Ok().json(PublicUser::from(user)))
}
