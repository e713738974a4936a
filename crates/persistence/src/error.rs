//! Error types for the persistence layer.
//!
//! Input errors ([`ValidationError`]) are raised before any backend is
//! contacted. Backend errors ([`BackendError`]) come from the round trip to
//! Elasticsearch or PostgreSQL and are never retried.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Request validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors caused by caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The column is not one of the filterable columns.
    #[error("invalid column: {column}")]
    InvalidColumn { column: String },

    /// A filter key in the request is not allow-listed.
    #[error("unsupported filter column: {column}")]
    UnsupportedColumn { column: String },

    /// Page number or page size is not positive.
    #[error("invalid page: {message}")]
    InvalidPage { message: String },

    /// The keyset cursor could not be interpreted as a sort key.
    #[error("invalid cursor: {cursor}")]
    InvalidCursor { cursor: String },
}

/// Errors raised while talking to a backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// The backend was reached but the query failed.
    #[error("query failed on {backend_name}: {message}")]
    QueryFailed {
        backend_name: String,
        message: String,
    },

    /// Building the client or connection pool failed.
    #[error("connection failed for {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },
}

impl BackendError {
    /// Returns the name of the backend that raised the error.
    pub fn backend_name(&self) -> &str {
        match self {
            BackendError::Unavailable { backend_name, .. }
            | BackendError::QueryFailed { backend_name, .. }
            | BackendError::ConnectionFailed { backend_name, .. } => backend_name,
        }
    }
}

impl StorageError {
    /// Shorthand for [`BackendError::Unavailable`].
    pub fn unavailable(backend_name: &str, message: impl Into<String>) -> Self {
        StorageError::Backend(BackendError::Unavailable {
            backend_name: backend_name.to_string(),
            message: message.into(),
        })
    }

    /// Shorthand for [`BackendError::QueryFailed`].
    pub fn query_failed(backend_name: &str, message: impl Into<String>) -> Self {
        StorageError::Backend(BackendError::QueryFailed {
            backend_name: backend_name.to_string(),
            message: message.into(),
        })
    }

    /// Returns true if the error was caused by caller input.
    pub fn is_validation(&self) -> bool {
        matches!(self, StorageError::Validation(_))
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
