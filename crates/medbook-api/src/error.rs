//! Medbook — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use medbook_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A domain error from the application layer.
    Domain(DomainError),
    /// The actor is authenticated but lacks the required capability.
    Forbidden(String),
    /// The request carries no usable identity.
    Unauthorized(String),
}

impl ApiError {
    /// Convenience constructor for capability failures.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Convenience constructor for identity failures.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::Domain(err) => {
                let (status, code) = match &err {
                    DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
                    DomainError::ConcurrencyConflict { .. } => {
                        (StatusCode::CONFLICT, "concurrency_conflict")
                    }
                    DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                    DomainError::SlotUnavailable => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "slot_unavailable")
                    }
                    DomainError::TransientIo(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "temporarily_unavailable")
                    }
                    DomainError::ProjectionFault(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                    }
                };
                (status, code, err.to_string())
            }
            Self::Forbidden(message) => (StatusCode::FORBIDDEN, "forbidden", message),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, "unauthorized", message),
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: DomainError) -> StatusCode {
        ApiError::Domain(err).into_response().status()
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation {
                rule: "appointment_starts_in_future",
                message: "in the past".into(),
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::NotFound {
                entity: "user",
                id: "abc".into(),
            }),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_concurrency_conflict_maps_to_409() {
        assert_eq!(
            status_of(DomainError::ConcurrencyConflict {
                stream_id: "appointments:northside:d1".into(),
                expected: 1,
                actual: 2,
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_unavailable_slot_maps_to_422() {
        assert_eq!(
            status_of(DomainError::SlotUnavailable),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_transient_io_maps_to_503() {
        assert_eq!(
            status_of(DomainError::TransientIo("db down".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        assert_eq!(
            ApiError::forbidden("not your facility")
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        assert_eq!(
            ApiError::unauthorized("missing identity")
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
