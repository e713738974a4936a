//! Row listing extractor.
//!
//! Turns the raw query string of a row listing into a [`RowQuery`].

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use leadboard_persistence::core::RowStore;
use leadboard_persistence::types::{FilterSelection, PageRequest, RowQuery, parse_lenient};
use tracing::debug;

use crate::error::RestError;
use crate::state::AppState;

/// Axum extractor for row listings.
///
/// Reads `page`, `limit`, `mode` and `cursor`; every other key must be an
/// allow-listed column carrying comma separated values.
///
/// Keyset mode is selected by `mode=keyset` or by the presence of a
/// `cursor` parameter; a cursor together with `mode=offset` is rejected.
/// `limit` falls back to the configured default page size when absent or
/// unparseable, and is clamped to the configured maximum.
///
/// # Example
///
/// ```rust,ignore
/// async fn rows_handler(params: RowsParams) {
///     let query = params.into_query();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RowsParams {
    query: RowQuery,
}

impl RowsParams {
    /// Builds the row query from raw query-string pairs.
    pub fn from_pairs<K, V>(
        pairs: &[(K, V)],
        default_page_size: u32,
        max_page_size: u32,
    ) -> Result<Self, RestError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let selection = FilterSelection::from_params(
            pairs.iter().map(|(key, value)| (key.as_ref(), value.as_ref())),
        )?;

        let limit = parse_lenient(first(pairs, "limit"), i64::from(default_page_size));
        let cursor = first(pairs, "cursor").filter(|c| !c.trim().is_empty());
        let keyset = match first(pairs, "mode").map(str::trim) {
            None | Some("") => cursor.is_some(),
            Some("keyset") => true,
            Some("offset") if cursor.is_some() => {
                return Err(RestError::BadRequest {
                    message: "cursor is only valid with mode=keyset".to_string(),
                });
            }
            Some("offset") => false,
            Some(other) => {
                return Err(RestError::BadRequest {
                    message: format!("unsupported pagination mode: {other}"),
                });
            }
        };

        let page = if keyset {
            PageRequest::keyset(cursor.map(String::from), limit)?
        } else {
            PageRequest::offset(parse_lenient(first(pairs, "page"), 1), limit)?
        };

        Ok(Self {
            query: RowQuery::new(selection, page.with_max_page_size(max_page_size)),
        })
    }

    /// Consumes the extractor, returning the parsed query.
    pub fn into_query(self) -> RowQuery {
        self.query
    }
}

/// Returns the first value of `name`; repeated pagination keys use the first.
fn first<'a, K, V>(pairs: &'a [(K, V)], name: &str) -> Option<&'a str>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .find(|(key, _)| key.as_ref() == name)
        .map(|(_, value)| value.as_ref())
}

impl<S> FromRequestParts<AppState<S>> for RowsParams
where
    S: RowStore + 'static,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri).map_err(
            |e| RestError::BadRequest {
                message: e.body_text(),
            },
        )?;

        let params = Self::from_pairs(&pairs, state.default_page_size(), state.max_page_size())?;
        debug!(query = ?params.query, "Parsed row query");
        Ok(params)
    }
}
