//! In-memory row store.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info};

use crate::core::{
    BackendKind, FILTER_SEARCH_LIMIT, FILTER_VALUES_LIMIT, RowStore, normalize_search,
};
use crate::error::{BackendError, StorageError, StorageResult, ValidationError};
use crate::types::{
    FilterColumn, FilterSelection, KeysetPage, PageResult, Row, SORT_KEY, parse_timestamp,
    row_sort_key, row_text_value,
};

const BACKEND_NAME: &str = "memory";

/// Row store backed by a vector in process memory.
///
/// Cloning is cheap and clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    rows: Arc<RwLock<Vec<Row>>>,
}

impl MemoryBackend {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `rows`.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Creates a store from JSON values, each of which must be an object.
    pub fn from_values(values: Vec<Value>) -> StorageResult<Self> {
        let rows = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(row) => Ok(row),
                other => Err(connection_failed(format!(
                    "row {index} is not a JSON object: {other}"
                ))),
            })
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(Self::from_rows(rows))
    }

    /// Loads a store from a file containing a JSON array of row objects.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            connection_failed(format!("failed to read {}: {e}", path.display()))
        })?;
        let values: Vec<Value> = serde_json::from_str(&text).map_err(|e| {
            connection_failed(format!("failed to parse {}: {e}", path.display()))
        })?;
        let backend = Self::from_values(values)?;
        info!(path = %path.display(), rows = backend.len(), "Loaded in-memory dataset");
        Ok(backend)
    }

    /// Appends a row.
    pub fn insert(&self, row: Row) {
        self.rows.write().push(row);
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns true if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Matching rows, newest first. Rows without a readable `created_at`
    /// come last, in insertion order.
    fn sorted_matches(&self, selection: &FilterSelection) -> Vec<(Option<DateTime<Utc>>, Row)> {
        let rows = self.rows.read();
        let mut matches: Vec<_> = rows
            .iter()
            .filter(|row| selection.matches(row))
            .map(|row| (sort_timestamp(row), row.clone()))
            .collect();
        matches.sort_by_key(|(ts, _)| Reverse(*ts));
        matches
    }
}

fn connection_failed(message: String) -> StorageError {
    StorageError::Backend(BackendError::ConnectionFailed {
        backend_name: BACKEND_NAME.to_string(),
        message,
    })
}

fn sort_timestamp(row: &Row) -> Option<DateTime<Utc>> {
    row_sort_key(row, SORT_KEY).and_then(|raw| parse_timestamp(&raw))
}

#[async_trait]
impl RowStore for MemoryBackend {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn resolve_filter_values(
        &self,
        column: FilterColumn,
        search: Option<&str>,
    ) -> StorageResult<Vec<String>> {
        let search = normalize_search(search).map(str::to_lowercase);
        let limit = if search.is_some() {
            FILTER_SEARCH_LIMIT
        } else {
            FILTER_VALUES_LIMIT
        };

        let rows = self.rows.read();
        let distinct: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| row_text_value(row, column.as_str()))
            .filter(|value| !value.is_empty())
            .filter(|value| match &search {
                Some(needle) => value.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .collect();

        debug!(column = %column, distinct = distinct.len(), "Resolved filter values");
        Ok(distinct.into_iter().take(limit).collect())
    }

    async fn query_offset(
        &self,
        selection: &FilterSelection,
        page: u32,
        page_size: u32,
    ) -> StorageResult<PageResult<Row>> {
        let matches = self.sorted_matches(selection);
        let total = matches.len() as u64;
        let skip = (u64::from(page.saturating_sub(1)) * u64::from(page_size)) as usize;

        let rows: Vec<Row> = matches
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .map(|(_, row)| row)
            .collect();

        Ok(PageResult::new(rows, total, page, page_size))
    }

    async fn query_keyset(
        &self,
        selection: &FilterSelection,
        cursor: Option<&str>,
        page_size: u32,
    ) -> StorageResult<KeysetPage<Row>> {
        let cursor = match cursor {
            Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
                ValidationError::InvalidCursor {
                    cursor: raw.to_string(),
                }
            })?),
            None => None,
        };

        let rows: Vec<Row> = self
            .sorted_matches(selection)
            .into_iter()
            .filter(|(ts, _)| match cursor {
                // Strictly older than the cursor; rows without a timestamp
                // cannot be compared and only appear on the first page.
                Some(cursor) => ts.is_some_and(|ts| ts < cursor),
                None => true,
            })
            .take(page_size as usize)
            .map(|(_, row)| row)
            .collect();

        let last_key = rows.last().and_then(|row| row_sort_key(row, SORT_KEY));
        Ok(KeysetPage::new(rows, page_size, last_key))
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> MemoryBackend {
        MemoryBackend::from_values(vec![
            json!({"id": 1, "region": "Europe", "industry": "Technology", "created_at": "2024-01-01T00:00:00Z"}),
            json!({"id": 2, "region": "Asia", "industry": "Finance", "created_at": "2024-01-03T00:00:00Z"}),
            json!({"id": 3, "region": "North America", "industry": "Technology", "created_at": "2024-01-02T00:00:00Z"}),
            json!({"id": 4, "region": "", "industry": null, "created_at": "2024-01-04T00:00:00Z"}),
            json!({"id": 5, "region": "europe", "industry": "Retail"}),
        ])
        .unwrap()
    }

    fn ids(rows: &[Row]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_from_values_rejects_non_objects() {
        let err = MemoryBackend::from_values(vec![json!({"id": 1}), json!([1, 2])]).unwrap_err();
        assert!(err.to_string().contains("row 1 is not a JSON object"));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"id": 1, "region": "Europe"}]"#).unwrap();
        let backend = MemoryBackend::from_json_file(&path).unwrap();
        assert_eq!(backend.len(), 1);

        assert!(MemoryBackend::from_json_file(dir.path().join("missing.json")).is_err());
    }

    #[tokio::test]
    async fn test_filter_values_sorted_and_non_empty() {
        let values = backend()
            .resolve_filter_values(FilterColumn::Region, None)
            .await
            .unwrap();
        assert_eq!(values, vec!["Asia", "Europe", "North America", "europe"]);
    }

    #[tokio::test]
    async fn test_filter_values_search_ignores_case() {
        let values = backend()
            .resolve_filter_values(FilterColumn::Region, Some("EUR"))
            .await
            .unwrap();
        assert_eq!(values, vec!["Europe", "europe"]);

        let values = backend()
            .resolve_filter_values(FilterColumn::Industry, Some("   "))
            .await
            .unwrap();
        assert_eq!(values, vec!["Finance", "Retail", "Technology"]);
    }

    #[tokio::test]
    async fn test_filter_values_search_cap() {
        let rows = (0..50)
            .map(|i| json!({"location": format!("City {i:02}")}))
            .collect();
        let backend = MemoryBackend::from_values(rows).unwrap();

        let all = backend
            .resolve_filter_values(FilterColumn::Location, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 50);

        let searched = backend
            .resolve_filter_values(FilterColumn::Location, Some("city"))
            .await
            .unwrap();
        assert_eq!(searched.len(), FILTER_SEARCH_LIMIT);
        assert_eq!(searched[0], "City 00");
    }

    #[tokio::test]
    async fn test_offset_newest_first() {
        let page = backend()
            .query_offset(&FilterSelection::new(), 1, 3)
            .await
            .unwrap();
        assert_eq!(ids(&page.rows), vec![4, 2, 3]);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.total_pages, 2);

        let page = backend()
            .query_offset(&FilterSelection::new(), 2, 3)
            .await
            .unwrap();
        assert_eq!(ids(&page.rows), vec![1, 5]);

        let page = backend()
            .query_offset(&FilterSelection::new(), 9, 3)
            .await
            .unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_count, 5);
    }

    #[tokio::test]
    async fn test_offset_with_selection() {
        let selection =
            FilterSelection::new().with_values(FilterColumn::Industry, ["Technology"]);
        let page = backend().query_offset(&selection, 1, 25).await.unwrap();
        assert_eq!(ids(&page.rows), vec![3, 1]);
        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_keyset_pages() {
        let backend = backend();
        let selection = FilterSelection::new();

        let first = backend.query_keyset(&selection, None, 2).await.unwrap();
        assert_eq!(ids(&first.rows), vec![4, 2]);
        assert_eq!(first.next_cursor.as_deref(), Some("2024-01-03T00:00:00Z"));

        let second = backend
            .query_keyset(&selection, first.next_cursor.as_deref(), 2)
            .await
            .unwrap();
        assert_eq!(ids(&second.rows), vec![3, 1]);

        let third = backend
            .query_keyset(&selection, second.next_cursor.as_deref(), 2)
            .await
            .unwrap();
        assert!(third.rows.is_empty());
        assert_eq!(third.next_cursor, None);
    }

    #[tokio::test]
    async fn test_keyset_rejects_unreadable_cursor() {
        let err = backend()
            .query_keyset(&FilterSelection::new(), Some("not-a-date"), 2)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
