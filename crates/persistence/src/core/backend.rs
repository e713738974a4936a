//! Backend identification.

use std::fmt;

/// Identifies the type of store behind a [`RowStore`](super::RowStore).
///
/// Used for logging and for the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// In-process rows, for development and tests.
    Memory,
    /// PostgreSQL database.
    Postgres,
    /// Elasticsearch (search engine).
    Elasticsearch,
}

impl BackendKind {
    /// Returns the lowercase backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Postgres => "postgres",
            BackendKind::Elasticsearch => "elasticsearch",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
