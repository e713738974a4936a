//! Response bodies for the Leadboard API.
//!
//! Row pages serialize straight from
//! [`RowPage`](leadboard_persistence::types::RowPage):
//!
//! - offset: `{data, totalCount, totalPages, currentPage}`
//! - keyset: `{data, nextCursor, currentPageSize}`

use serde::Serialize;

/// Body of `GET /filters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterValuesResponse {
    /// Distinct values of the requested column.
    pub values: Vec<String>,
}

/// Body of the health and readiness probes.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `ready`.
    pub status: &'static str,
    /// Name of the storage backend.
    pub backend: &'static str,
    /// RFC 3339 time the probe ran.
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadboard_persistence::types::{KeysetPage, PageResult, Row, RowPage};
    use serde_json::json;

    fn row(id: i64) -> Row {
        json!({ "id": id }).as_object().cloned().unwrap()
    }

    #[test]
    fn test_filter_values_shape() {
        let body = FilterValuesResponse {
            values: vec!["Europe".to_string()],
        };
        assert_eq!(serde_json::to_value(body).unwrap(), json!({ "values": ["Europe"] }));
    }

    #[test]
    fn test_offset_page_shape() {
        let page = RowPage::Offset(PageResult::new(vec![row(1)], 30, 2, 25));
        assert_eq!(
            serde_json::to_value(page).unwrap(),
            json!({
                "data": [{ "id": 1 }],
                "totalCount": 30,
                "totalPages": 2,
                "currentPage": 2,
            })
        );
    }

    #[test]
    fn test_keyset_page_shape() {
        let page = RowPage::Keyset(KeysetPage::new(
            vec![row(1)],
            1,
            Some("2024-01-01T00:00:00Z".to_string()),
        ));
        assert_eq!(
            serde_json::to_value(page).unwrap(),
            json!({
                "data": [{ "id": 1 }],
                "nextCursor": "2024-01-01T00:00:00Z",
                "currentPageSize": 1,
            })
        );
    }
}
