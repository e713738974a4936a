//! Elasticsearch backend implementation.
//!
//! Rows live as documents in a single index (`master_table` by default) with
//! the usual dynamic mapping: every text column gets a `.keyword` sub-field.
//!
//! - **Filter values**: a `terms` aggregation on `<column>.keyword`, most
//!   frequent first, optionally narrowed by a case-insensitive wildcard.
//! - **Offset pages**: `from`/`size` with `track_total_hits` for an exact count.
//! - **Keyset pages**: `search_after` over the `created_at` sort.
//!
//! # Example
//!
//! ```no_run
//! use leadboard_persistence::backends::elasticsearch::{ElasticsearchBackend, ElasticsearchConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ElasticsearchConfig {
//!     nodes: vec!["http://localhost:9200".to_string()],
//!     ..Default::default()
//! };
//! let backend = ElasticsearchBackend::new(config)?;
//! # Ok(())
//! # }
//! ```

mod backend;
pub mod query_builder;
mod store_impl;

pub use backend::{ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig};
