use actix_web::http::StatusCode;
use actix_web::{error, HttpRequest, HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Server-side failure outside storage. The message is generic.
    #[error("{0}")]
    Internal(&'static str),

    /// Storage failure. Only `context` reaches the client.
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Adapter for `map_err` on sqlx results.
    pub fn storage(context: &'static str) -> impl FnOnce(sqlx::Error) -> ApiError {
        move |source| {
            error!("{}: {}", context, source);
            ApiError::Storage { context, source }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) | ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // The web client reads `message` on 404s and `error` everywhere else.
        let body = match self {
            ApiError::NotFound(message) => json!({ "message": message }),
            other => json!({ "error": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Turns malformed JSON bodies into `400 {error}` instead of actix's plain text.
pub fn json_config() -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        ApiError::validation(err.to_string()).into()
    })
}

pub fn query_config() -> actix_web::web::QueryConfig {
    actix_web::web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        ApiError::validation(err.to_string()).into()
    })
}

pub fn path_config() -> actix_web::web::PathConfig {
    actix_web::web::PathConfig::default().error_handler(|err: error::PathError, _req: &HttpRequest| {
        ApiError::validation(err.to_string()).into()
    })
}
