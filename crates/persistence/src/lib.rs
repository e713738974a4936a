//! Leadboard Persistence Layer
//!
//! This crate turns dashboard requests into backend queries against the
//! `master_table` lead dataset and shapes the answers into pages.
//!
//! # Features
//!
//! - **Allow-listed filters**: only [`FilterColumn`](types::FilterColumn) names can
//!   ever reach a predicate
//! - **Two pagination modes**: offset (with accurate totals) and keyset
//!   (stable under concurrent inserts, no totals)
//! - **Interchangeable backends** behind the [`RowStore`](core::RowStore) trait
//!
//! # Backend Features
//!
//! - `postgres` (default) - PostgreSQL via deadpool-postgres
//! - `elasticsearch` (default) - Elasticsearch via the official client
//!
//! The in-memory backend is always available.
//!
//! # Architecture
//!
//! - [`types`] - Rows, filter selections, page requests and results
//! - [`error`] - Error types for all operations
//! - [`core`] - The `RowStore` trait and pagination helpers
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use leadboard_persistence::backends::memory::MemoryBackend;
//! use leadboard_persistence::core::RowStore;
//! use leadboard_persistence::types::{FilterSelection, PageRequest, RowQuery};
//!
//! # tokio_test_block(async {
//! let backend = MemoryBackend::new();
//! let query = RowQuery::new(FilterSelection::new(), PageRequest::offset(1, 25).unwrap());
//! let page = backend.query_page(&query).await.unwrap();
//! assert_eq!(page.returned_count(), 0);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{StorageError, StorageResult};
