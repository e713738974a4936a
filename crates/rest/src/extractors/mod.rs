//! Axum extractors for Leadboard requests.
//!
//! - [`RowsParams`] - Filter selection and page request for `/rows`
//! - [`FilterValuesParams`] - Column and search term for `/filters`

mod filter_values;
mod rows;

pub use filter_values::FilterValuesParams;
pub use rows::RowsParams;
