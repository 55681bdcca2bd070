use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;

use crate::db::StoreError;

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const INVALID_HEADER: &str = "Invalid Authorization header.";
pub const INVALID_TOKEN: &str = "Invalid or expired token.";
pub const NOT_FOUND: &str = "Not found.";

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Errors surfaced to HTTP clients. Every variant renders as `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error.")]
    Internal,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthenticated() -> Self {
        ApiError::Authentication(NOT_AUTHENTICATED.to_string())
    }

    pub fn not_found() -> Self {
        ApiError::NotFound(NOT_FOUND.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody { error: &message })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        log::error!("Store failure: {}", err);
        ApiError::Internal
    }
}

/// Maps malformed JSON bodies onto the common error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected JSON payload: {}", err);
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json.".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Malformed request body: {}", e),
        _ => "Malformed request body.".to_string(),
    };
    ApiError::Validation(message).into()
}
