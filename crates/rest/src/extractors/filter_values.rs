//! Filter value extractor.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use leadboard_persistence::types::FilterColumn;
use serde::Deserialize;

use crate::error::RestError;

/// Axum extractor for filter value lookups.
///
/// `column` is required and must be allow-listed; `search` is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterValuesParams {
    /// Column whose values are listed.
    pub column: FilterColumn,
    /// Substring the values must contain, if any.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilterValuesQuery {
    column: Option<String>,
    search: Option<String>,
}

impl FilterValuesParams {
    fn from_query(query: FilterValuesQuery) -> Result<Self, RestError> {
        let column = query
            .column
            .as_deref()
            .ok_or(RestError::InvalidColumn)?
            .parse::<FilterColumn>()?;
        Ok(Self {
            column,
            search: query.search,
        })
    }
}

impl<S> FromRequestParts<S> for FilterValuesParams
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<FilterValuesQuery>::try_from_uri(&parts.uri).map_err(|e| {
            RestError::BadRequest {
                message: e.body_text(),
            }
        })?;
        Self::from_query(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(column: Option<&str>, search: Option<&str>) -> Result<FilterValuesParams, RestError> {
        FilterValuesParams::from_query(FilterValuesQuery {
            column: column.map(String::from),
            search: search.map(String::from),
        })
    }

    #[test]
    fn test_valid_column() {
        let params = parse(Some("job_title"), Some("eng")).unwrap();
        assert_eq!(params.column, FilterColumn::JobTitle);
        assert_eq!(params.search.as_deref(), Some("eng"));
    }

    #[test]
    fn test_missing_column() {
        assert!(matches!(parse(None, None), Err(RestError::InvalidColumn)));
    }

    #[test]
    fn test_disallowed_column() {
        assert!(matches!(
            parse(Some("salary"), None),
            Err(RestError::InvalidColumn)
        ));
    }
}
