//! Health check endpoint handlers.
//!
//! Probes are never behind the session token gate.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use leadboard_persistence::core::RowStore;
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};
use crate::responses::HealthResponse;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Reports the process as up without contacting the backend.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Json<HealthResponse>
where
    S: RowStore + 'static,
{
    debug!("Processing health check request");

    Json(HealthResponse {
        status: "healthy",
        backend: state.storage().backend_name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Runs the backend health check (`SELECT 1` on PostgreSQL, cluster
/// health on Elasticsearch).
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - Backend reachable
/// - `503 Service Unavailable` - Backend check failed
pub async fn readiness_handler<S>(
    State(state): State<AppState<S>>,
) -> RestResult<Json<HealthResponse>>
where
    S: RowStore + 'static,
{
    debug!("Processing readiness check request");

    let backend = state.storage().backend_name();
    if let Err(e) = state.storage().health_check().await {
        warn!(backend, error = %e, "Readiness check failed");
        return Err(RestError::NotReady { backend });
    }

    Ok(Json(HealthResponse {
        status: "ready",
        backend,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
