//! Error handling - field-keyed validation bodies and RFC 7807 problems.

use actix_web::{
    HttpResponse, ResponseError,
    http::{StatusCode, header},
};
use blog_core::DomainError;
use blog_shared::{ErrorResponse, FieldErrors};
use std::fmt;

/// Application-level error type rendered as an HTTP response.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Validation(FieldErrors),
    /// Missing or invalid credentials; carries the client-facing reason.
    Unauthenticated(String),
    Forbidden,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors.0),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        match self {
            AppError::Validation(errors) => builder.json(errors),
            AppError::NotFound(detail) => builder.json(ErrorResponse::not_found(detail)),
            AppError::BadRequest(detail) => builder.json(ErrorResponse::bad_request(detail)),
            AppError::Unauthenticated(detail) => builder
                .insert_header((header::WWW_AUTHENTICATE, "Token"))
                .json(ErrorResponse::unauthorized(detail)),
            AppError::Forbidden => builder.json(ErrorResponse::forbidden()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                builder.json(ErrorResponse::internal_error())
            }
        }
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => AppError::Validation(FieldErrors(errors.by_field())),
            DomainError::NotFound { .. } => AppError::NotFound("Not found.".to_string()),
            DomainError::InvalidCredential => {
                AppError::Unauthenticated("Invalid credentials.".to_string())
            }
            DomainError::Unauthenticated => AppError::Unauthenticated(
                "Authentication credentials were not provided.".to_string(),
            ),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
