//! Core storage traits.
//!
//! - [`RowStore`] - Filter value resolution and paginated row listing
//! - [`BackendKind`] - Identifies the store implementation
//!
//! Every backend answers the same three questions: which values exist for a
//! filter column, which rows match a filter selection (one page at a time),
//! and whether the store is reachable. Request parsing and validation happen
//! before a store is called, so implementations only ever see allow-listed
//! columns and positive page sizes.

mod backend;
mod store;

pub use backend::BackendKind;
pub use store::{FILTER_SEARCH_LIMIT, FILTER_VALUES_LIMIT, RowStore, normalize_search};
