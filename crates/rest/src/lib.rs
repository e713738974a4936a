//! # leadboard-rest - HTTP API for the Leadboard lead browser
//!
//! This crate serves the `master_table` lead dataset to the dashboard:
//! distinct values for the filter dropdowns, and filtered rows in either
//! offset or keyset pages.
//!
//! ## Backend Support
//!
//! Storage backends come from `leadboard-persistence` and are selected by
//! feature flags:
//!
//! - `elasticsearch` - Elasticsearch (default)
//! - `postgres` - PostgreSQL (default)
//!
//! The in-memory backend is always available.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use leadboard_persistence::backends::memory::MemoryBackend;
//! use leadboard_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let backend = MemoryBackend::from_json_file("rows.json").unwrap();
//!     let app = create_app_with_config(backend, ServerConfig::for_testing());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | filter values | GET | `/filters?column=&search=` |
//! | rows (offset) | GET | `/rows?page=&limit=&<column>=a,b` |
//! | rows (keyset) | GET | `/rows?mode=keyset&limit=&cursor=` |
//! | aliases | GET | `/api/master_table/filters`, `/api/master_table` |
//! | probes | GET | `/health`, `/_liveness`, `/_readiness` |
//!
//! ## Error Handling
//!
//! | HTTP Status | Description |
//! |-------------|-------------|
//! | 400 | Invalid column, page, limit or cursor |
//! | 401 | Missing or invalid session token |
//! | 500 | Backend failure (details are logged, not returned) |
//! | 503 | Readiness check failed |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and JSON error bodies
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Session token verification
//! - [`extractors`] - Query string parsing
//! - [`responses`] - Response bodies
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use http::{HeaderName, HeaderValue, Method};
use leadboard_persistence::core::RowStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with custom configuration.
///
/// Sets up every route with request tracing, the request timeout and, when
/// enabled, CORS.
///
/// # Example
///
/// ```rust
/// use leadboard_persistence::backends::memory::MemoryBackend;
/// use leadboard_rest::{ServerConfig, create_app_with_config};
///
/// let config = ServerConfig {
///     enable_auth: false,
///     ..ServerConfig::for_testing()
/// };
/// let app = create_app_with_config(MemoryBackend::new(), config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: RowStore + 'static,
{
    info!(
        backend = storage.backend_name(),
        auth = config.enable_auth,
        "Creating Leadboard API"
    );

    let state = AppState::new(Arc::new(storage), config.clone());
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = if config.cors_origins.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            split_csv(&config.cors_origins)
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    let methods = if config.cors_methods.trim() == "*" {
        AllowMethods::from(Any)
    } else {
        AllowMethods::list(
            split_csv(&config.cors_methods).filter_map(|m| m.parse::<Method>().ok()),
        )
    };

    let headers = if config.cors_headers.trim() == "*" {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(
            split_csv(&config.cors_headers).filter_map(|h| h.parse::<HeaderName>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
}

fn split_csv(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG`, when set,
/// takes precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "leadboard={level},leadboard_rest={level},leadboard_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
