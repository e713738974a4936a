//! The row store trait.

use std::fmt::Debug;

use async_trait::async_trait;

use super::backend::BackendKind;
use crate::error::StorageResult;
use crate::types::{
    FilterColumn, FilterSelection, KeysetPage, PageRequest, PageResult, Row, RowPage, RowQuery,
};

/// Maximum number of distinct values returned without a search term.
pub const FILTER_VALUES_LIMIT: usize = 100;

/// Maximum number of distinct values returned for a search term.
///
/// Only the SQL-style resolvers (PostgreSQL, in-memory) apply it;
/// Elasticsearch always returns up to [`FILTER_VALUES_LIMIT`] buckets.
pub const FILTER_SEARCH_LIMIT: usize = 20;

/// Returns the trimmed search term, or `None` when it is absent or blank.
pub fn normalize_search(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}

/// A read-only source of `master_table` rows.
///
/// Implementations translate a [`RowQuery`] into their native query language,
/// execute it and shape the result. They never retry; a failed round trip
/// surfaces as a [`BackendError`](crate::error::BackendError).
///
/// # Example
///
/// ```
/// use leadboard_persistence::backends::memory::MemoryBackend;
/// use leadboard_persistence::core::RowStore;
/// use leadboard_persistence::types::FilterColumn;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let backend = MemoryBackend::new();
/// let values = backend
///     .resolve_filter_values(FilterColumn::Region, Some("eu"))
///     .await
///     .unwrap();
/// assert!(values.is_empty());
/// # }
/// ```
#[async_trait]
pub trait RowStore: Send + Sync + Debug {
    /// Returns the kind of backend.
    fn backend_kind(&self) -> BackendKind;

    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str {
        self.backend_kind().as_str()
    }

    /// Lists distinct non-empty values of `column`.
    ///
    /// A non-blank `search` restricts the list to values containing it,
    /// ignoring case.
    async fn resolve_filter_values(
        &self,
        column: FilterColumn,
        search: Option<&str>,
    ) -> StorageResult<Vec<String>>;

    /// Returns one offset page, newest first, with the total match count.
    async fn query_offset(
        &self,
        selection: &FilterSelection,
        page: u32,
        page_size: u32,
    ) -> StorageResult<PageResult<Row>>;

    /// Returns the rows strictly older than `cursor`, newest first.
    async fn query_keyset(
        &self,
        selection: &FilterSelection,
        cursor: Option<&str>,
        page_size: u32,
    ) -> StorageResult<KeysetPage<Row>>;

    /// Executes a query in whichever mode its page request names.
    async fn query_page(&self, query: &RowQuery) -> StorageResult<RowPage> {
        match &query.page {
            PageRequest::Offset { page, page_size } => self
                .query_offset(&query.selection, *page, *page_size)
                .await
                .map(RowPage::Offset),
            PageRequest::Keyset { cursor, page_size } => self
                .query_keyset(&query.selection, cursor.as_deref(), *page_size)
                .await
                .map(RowPage::Keyset),
        }
    }

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> StorageResult<()>;
}
