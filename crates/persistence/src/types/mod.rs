//! Core types for the persistence layer.
//!
//! - [`Row`] - One record of the `master_table` dataset
//! - [`FilterColumn`], [`FilterSelection`] - Allow-listed filters
//! - [`PageRequest`], [`PageResult`], [`KeysetPage`], [`RowPage`] - Pagination types
//! - [`RowQuery`] - A filter selection paired with a page request
//!
//! # Examples
//!
//! ## Parsing a request
//!
//! ```
//! use leadboard_persistence::types::{FilterColumn, FilterSelection, PageRequest};
//!
//! let selection = FilterSelection::from_params([
//!     ("page", "2"),
//!     ("region", "Europe,Asia"),
//!     ("industry", "Technology"),
//! ])
//! .unwrap();
//!
//! assert_eq!(selection.values(FilterColumn::Region).unwrap().len(), 2);
//! assert!(selection.values(FilterColumn::Location).is_none());
//!
//! let page = PageRequest::offset(2, 25).unwrap();
//! assert_eq!(page.offset_value(), Some(25));
//! ```

mod column;
mod filter;
mod pagination;
mod query;
mod row;

pub use column::FilterColumn;
pub use filter::{FilterSelection, PAGINATION_PARAMS};
pub use pagination::{
    DEFAULT_PAGE_SIZE, KeysetPage, PageRequest, PageResult, RowPage, parse_lenient, total_pages,
};
pub use query::{RowQuery, SORT_KEY};
pub use row::{Row, parse_timestamp, row_sort_key, row_text_value};
