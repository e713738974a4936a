//! Row store implementations.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | (always) | Rows held in process, for development and tests |
//! | PostgreSQL | `postgres` | Parameterized SQL over a pooled connection |
//! | Elasticsearch | `elasticsearch` | Terms aggregations and bool queries |

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;
