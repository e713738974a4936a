//! HTTP request handlers.
//!
//! - [`filters`] - Distinct values for a filter column
//! - [`rows`] - Filtered, paginated rows
//! - [`health`] - Health, liveness and readiness probes

pub mod filters;
pub mod health;
pub mod rows;

pub use filters::filter_values_handler;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use rows::rows_handler;
