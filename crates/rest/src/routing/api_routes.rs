//! API route configuration.

use axum::{Router, middleware, routing::get};
use leadboard_persistence::core::RowStore;

use crate::handlers;
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Creates all API routes.
///
/// # Routes
///
/// ## Data (session token required when auth is enabled)
/// - `GET /filters` - Distinct values of a filter column
/// - `GET /rows` - Filtered, paginated rows
/// - `GET /api/master_table/filters` - Alias of `/filters`
/// - `GET /api/master_table` - Alias of `/rows`
///
/// ## Probes
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe (checks the backend)
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RowStore + 'static,
{
    let data = Router::new()
        .route("/filters", get(handlers::filter_values_handler::<S>))
        .route("/rows", get(handlers::rows_handler::<S>))
        .route(
            "/api/master_table/filters",
            get(handlers::filter_values_handler::<S>),
        )
        .route("/api/master_table", get(handlers::rows_handler::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<S>,
        ));

    let probes = Router::new()
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>));

    data.merge(probes).with_state(state)
}
