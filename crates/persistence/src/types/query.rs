//! Row queries.

use super::filter::FilterSelection;
use super::pagination::PageRequest;

/// Column every listing is ordered by, descending.
pub const SORT_KEY: &str = "created_at";

/// A filtered, paginated request for rows of `master_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowQuery {
    /// Predicates to apply.
    pub selection: FilterSelection,
    /// Which page to return.
    pub page: PageRequest,
}

impl RowQuery {
    /// Pairs a selection with a page request.
    pub fn new(selection: FilterSelection, page: PageRequest) -> Self {
        Self { selection, page }
    }
}
