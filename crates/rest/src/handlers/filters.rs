//! Filter value handler.

use axum::{Json, extract::State};
use leadboard_persistence::core::RowStore;
use tracing::debug;

use crate::error::{Operation, RestError, RestResult};
use crate::extractors::FilterValuesParams;
use crate::responses::FilterValuesResponse;
use crate::state::AppState;

/// Lists the distinct values of one filter column.
///
/// # HTTP Request
///
/// `GET [base]/filters?column=<name>&search=<substring>`
///
/// # Response
///
/// - `200 OK` - `{values}`
/// - `400 Bad Request` - Missing or non-allow-listed column
/// - `500 Internal Server Error` - Backend failure, `{error, values: []}`
pub async fn filter_values_handler<S>(
    State(state): State<AppState<S>>,
    params: FilterValuesParams,
) -> RestResult<Json<FilterValuesResponse>>
where
    S: RowStore + 'static,
{
    debug!(
        column = %params.column,
        search = ?params.search,
        "Processing filter values request"
    );

    let values = state
        .storage()
        .resolve_filter_values(params.column, params.search.as_deref())
        .await
        .map_err(|e| RestError::from_storage(e, Operation::FilterValues))?;

    Ok(Json(FilterValuesResponse { values }))
}
