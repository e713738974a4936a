//! Error types for the Leadboard HTTP API.
//!
//! Every error renders as a JSON object with an `error` message. Failures
//! on data routes additionally carry an empty payload so that clients render
//! "no data" rather than a stale or partial page.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status | Body |
//! |---------------|-------------|------|
//! | InvalidColumn | 400 | `{error}` |
//! | UnsupportedColumn / InvalidPage / InvalidCursor | 400 | `{error}` |
//! | Backend (rows) | 500 | `{error, data: [], totalCount: 0, totalPages: 0}` |
//! | Backend (filter values) | 500 | `{error, values: []}` |
//!
//! Backend details are logged, never returned.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use leadboard_persistence::error::{StorageError, ValidationError};
use serde_json::json;
use tracing::{error, warn};

/// Message returned for a missing or non-allow-listed `column`.
pub const INVALID_COLUMN_MESSAGE: &str = "Invalid or missing column";

/// Message returned when a row query fails in the backend.
pub const ROWS_FAILED_MESSAGE: &str = "Failed to fetch master_table data";

/// Message returned when a filter value lookup fails in the backend.
pub const FILTER_VALUES_FAILED_MESSAGE: &str = "Failed to fetch filter values";

/// The operation a backend failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Listing rows.
    Rows,
    /// Listing filter values.
    FilterValues,
}

/// The primary error type for HTTP operations.
#[derive(Debug)]
pub enum RestError {
    /// The `column` parameter is missing or not allow-listed (HTTP 400).
    InvalidColumn,

    /// Any other rejected input (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Missing or invalid session token (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The backend failed while serving `operation` (HTTP 500).
    BackendFailure {
        /// What was being served.
        operation: Operation,
    },

    /// The backend failed its readiness check (HTTP 503).
    NotReady {
        /// Name of the backend.
        backend: &'static str,
    },
}

impl RestError {
    /// Converts a storage error raised while serving `operation`.
    ///
    /// Validation errors keep their message. Backend errors are logged and
    /// replaced with a generic failure.
    pub fn from_storage(err: StorageError, operation: Operation) -> Self {
        match err {
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => {
                error!(
                    backend = e.backend_name(),
                    operation = ?operation,
                    error = %e,
                    "Backend query failed"
                );
                RestError::BackendFailure { operation }
            }
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::InvalidColumn => write!(f, "{}", INVALID_COLUMN_MESSAGE),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::BackendFailure { operation } => match operation {
                Operation::Rows => write!(f, "{}", ROWS_FAILED_MESSAGE),
                Operation::FilterValues => write!(f, "{}", FILTER_VALUES_FAILED_MESSAGE),
            },
            RestError::NotReady { backend } => write!(f, "Backend {} is not ready", backend),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            RestError::InvalidColumn => (
                StatusCode::BAD_REQUEST,
                json!({ "error": INVALID_COLUMN_MESSAGE }),
            ),
            RestError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            RestError::Unauthorized { message } => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            RestError::BackendFailure {
                operation: Operation::Rows,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": ROWS_FAILED_MESSAGE,
                    "data": [],
                    "totalCount": 0,
                    "totalPages": 0,
                }),
            ),
            RestError::BackendFailure {
                operation: Operation::FilterValues,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": FILTER_VALUES_FAILED_MESSAGE,
                    "values": [],
                }),
            ),
            RestError::NotReady { backend } => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "status": "not_ready",
                    "backend": backend,
                    "error": self.to_string(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        warn!(error = %err, "Rejected request");
        match err {
            ValidationError::InvalidColumn { .. } => RestError::InvalidColumn,
            ValidationError::UnsupportedColumn { .. }
            | ValidationError::InvalidPage { .. }
            | ValidationError::InvalidCursor { .. } => RestError::BadRequest {
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for HTTP operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use leadboard_persistence::error::BackendError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display() {
        assert_eq!(RestError::InvalidColumn.to_string(), "Invalid or missing column");
        let err = RestError::BadRequest {
            message: "limit must be >= 1".to_string(),
        };
        assert_eq!(err.to_string(), "Bad request: limit must be >= 1");
    }

    #[test]
    fn test_validation_mapping() {
        let err: RestError = ValidationError::InvalidColumn {
            column: "salary".to_string(),
        }
        .into();
        assert!(matches!(err, RestError::InvalidColumn));

        let err: RestError = ValidationError::UnsupportedColumn {
            column: "salary".to_string(),
        }
        .into();
        assert!(
            matches!(err, RestError::BadRequest { ref message } if message.contains("salary"))
        );
    }

    #[test]
    fn test_backend_error_is_hidden() {
        let err = StorageError::Backend(BackendError::QueryFailed {
            backend_name: "postgres".to_string(),
            message: "relation \"master_table\" does not exist".to_string(),
        });
        let rest = RestError::from_storage(err, Operation::Rows);
        assert!(matches!(
            rest,
            RestError::BackendFailure {
                operation: Operation::Rows
            }
        ));
        assert!(!rest.to_string().contains("relation"));
    }

    #[tokio::test]
    async fn test_rows_failure_body() {
        let response = RestError::BackendFailure {
            operation: Operation::Rows,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], ROWS_FAILED_MESSAGE);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["totalCount"], 0);
        assert_eq!(body["totalPages"], 0);
    }

    #[tokio::test]
    async fn test_filter_values_failure_body() {
        let response = RestError::BackendFailure {
            operation: Operation::FilterValues,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({ "error": FILTER_VALUES_FAILED_MESSAGE, "values": [] })
        );
    }

    #[tokio::test]
    async fn test_unauthorized_body() {
        let response = RestError::Unauthorized {
            message: "Authentication required".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Authentication required" })
        );
    }
}
