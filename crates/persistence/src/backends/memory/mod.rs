//! In-memory backend implementation.
//!
//! Holds the dataset as a vector of JSON rows behind a read/write lock. It
//! follows the PostgreSQL resolver policy (lexicographic values, capped at
//! 100, or 20 with a search term) and orders listings by `created_at`
//! descending, so it stands in for a real store in local development and in
//! the test suite.
//!
//! # Example
//!
//! ```
//! use leadboard_persistence::backends::memory::MemoryBackend;
//! use serde_json::json;
//!
//! let backend = MemoryBackend::from_values(vec![
//!     json!({"id": 1, "region": "Europe", "created_at": "2024-01-01T00:00:00Z"}),
//!     json!({"id": 2, "region": "Asia", "created_at": "2024-01-02T00:00:00Z"}),
//! ])
//! .unwrap();
//! assert_eq!(backend.len(), 2);
//! ```

mod backend;

pub use backend::MemoryBackend;
