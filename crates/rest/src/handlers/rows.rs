//! Row listing handler.

use axum::{Json, extract::State};
use leadboard_persistence::core::RowStore;
use leadboard_persistence::types::RowPage;
use tracing::debug;

use crate::error::{Operation, RestError, RestResult};
use crate::extractors::RowsParams;
use crate::state::AppState;

/// Returns one page of `master_table` rows, newest first.
///
/// # HTTP Request
///
/// `GET [base]/rows?page=<n>&limit=<n>&<column>=<v1,v2>...`
///
/// `GET [base]/rows?mode=keyset&limit=<n>&cursor=<key>&<column>=<v1,v2>...`
///
/// # Response
///
/// - `200 OK` - `{data, totalCount, totalPages, currentPage}` in offset
///   mode, `{data, nextCursor, currentPageSize}` in keyset mode
/// - `400 Bad Request` - Unsupported column, non-positive page or limit,
///   or a malformed cursor
/// - `500 Internal Server Error` - Backend failure, with an empty page
pub async fn rows_handler<S>(
    State(state): State<AppState<S>>,
    params: RowsParams,
) -> RestResult<Json<RowPage>>
where
    S: RowStore + 'static,
{
    let query = params.into_query();

    let page = state
        .storage()
        .query_page(&query)
        .await
        .map_err(|e| RestError::from_storage(e, Operation::Rows))?;

    debug!(
        backend = state.storage().backend_name(),
        keyset = query.page.is_keyset(),
        returned = page.returned_count(),
        "Served row page"
    );

    Ok(Json(page))
}
