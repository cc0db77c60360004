use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use compute::ComputeError;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Failures surfaced to API callers.
///
/// Each request fails on its own; none of these stop the server.
#[derive(Error, Debug)]
pub enum AppError {
    /// A required field is missing for the given status
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Unrecognized value for an enumerated field
    #[error("{0}")]
    InvalidValue(String),

    #[error("{0}")]
    NotFound(String),

    /// Edit attempted outside the window or on a non-work update
    #[error("{0}")]
    EditWindowExpired(String),

    /// An update already exists for this user and date
    #[error("{0}")]
    DuplicateUpdate(String),

    /// Missing, unknown or expired session token
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ComputeError> for AppError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::Validation(msg) => AppError::Validation(msg),
            ComputeError::EditWindowExpired(msg) => AppError::EditWindowExpired(msg),
            ComputeError::Date(msg) => AppError::InvalidValue(msg),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EditWindowExpired(_) | AppError::DuplicateUpdate(_) => StatusCode::CONFLICT,
            AppError::PasswordHash(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidValue(_) => "INVALID_VALUE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::EditWindowExpired(_) => "EDIT_WINDOW_EXPIRED",
            AppError::DuplicateUpdate(_) => "DUPLICATE_UPDATE",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::PasswordHash(_) | AppError::Database(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::PasswordHash(_) | AppError::Database(_) => {
                error!("Internal error: {}", self);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            code: self.code().to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}

/// Whether a database error is a unique constraint violation.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_driver_errors_count_as_unique_violations() {
        assert!(!is_unique_violation(&DbErr::RecordNotFound("work_updates".to_string())));
        // Text alone is not enough
        assert!(!is_unique_violation(&DbErr::Custom(
            "UNIQUE constraint failed: work_updates.username".to_string()
        )));
    }

    #[test]
    fn test_status_and_code_mapping() {
        let err = AppError::DuplicateUpdate("alice already has an update".to_string());
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "DUPLICATE_UPDATE");

        let err = AppError::from(ComputeError::Date("invalid month 2024-13".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_VALUE");
    }
}
