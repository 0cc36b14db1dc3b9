// ============================================================================
// WFM API - Error Responses
// File: crates/wfm-api/src/error.rs
// Description: Maps domain errors onto HTTP status codes and a JSON body
// ============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use wfm_core::error::DomainError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests: {0}")]
    RateLimited(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized", msg)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, "Forbidden", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "Conflict", msg)
            }
            ApiError::RateLimited(msg) => {
                tracing::warn!("Rate limited: {}", msg);
                (StatusCode::TOO_MANY_REQUESTS, "RateLimited", msg)
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError", msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            DomainError::PasswordTooShort
            | DomainError::PasswordTooLong
            | DomainError::PasswordTooWeak => ApiError::BadRequest(err.to_string()),

            DomainError::InvalidCredentials
            | DomainError::UserNotActive
            | DomainError::InvalidToken
            | DomainError::InvalidInvoiceToken => ApiError::Unauthorized(err.to_string()),

            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),

            DomainError::UserNotFound
            | DomainError::TenantNotFound
            | DomainError::OrganizationNotFound
            | DomainError::EmployeeNotFound
            | DomainError::TeamNotFound
            | DomainError::InvoiceNotFound
            | DomainError::ExpenseNotFound
            | DomainError::TagNotFound
            | DomainError::NotificationNotFound => ApiError::NotFound(err.to_string()),

            DomainError::EmailAlreadyExists(msg) | DomainError::AlreadyExists(msg) => {
                ApiError::Conflict(msg)
            }

            DomainError::DatabaseError(msg) => ApiError::DatabaseError(msg),

            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::EmailSendError(_)
            | DomainError::InternalError(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

/// Converts `validator` failures on request DTOs into a 400.
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    ApiError::BadRequest(errors.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_not_found_maps_to_404() {
        let err: ApiError = DomainError::InvoiceNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn domain_conflict_maps_to_409() {
        let err: ApiError = DomainError::AlreadyExists("invoice number 7".to_string()).into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn domain_auth_failures_map_to_401() {
        for e in [
            DomainError::InvalidCredentials,
            DomainError::InvalidToken,
            DomainError::UserNotActive,
            DomainError::InvalidInvoiceToken,
        ] {
            let err: ApiError = e.into();
            assert!(matches!(err, ApiError::Unauthorized(_)));
        }
    }

    #[test]
    fn email_send_failure_is_internal() {
        let err: ApiError = DomainError::EmailSendError("smtp down".to_string()).into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }
}
