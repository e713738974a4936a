//! Filter selections.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use super::column::FilterColumn;
use super::row::Row;
use crate::error::ValidationError;

/// Query-string keys that carry pagination, never predicates.
pub const PAGINATION_PARAMS: &[&str] = &["page", "limit", "mode", "cursor"];

/// Selected values per allow-listed column.
///
/// An empty (or absent) value set places no constraint on its column.
/// Non-empty sets become "equals one of" predicates and are combined with
/// logical AND. Columns are kept ordered so that generated queries, and their
/// placeholder numbering, are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    columns: BTreeMap<FilterColumn, BTreeSet<String>>,
}

impl FilterSelection {
    /// Creates an empty selection that matches every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from raw query-string pairs.
    ///
    /// Pagination keys (see [`PAGINATION_PARAMS`]) are skipped. Every other
    /// key must name an allow-listed column, otherwise the whole request is
    /// rejected with [`ValidationError::UnsupportedColumn`]. Values are
    /// comma separated; repeated keys are merged.
    pub fn from_params<I, K, V>(params: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut selection = Self::new();
        for (key, value) in params {
            let key = key.as_ref();
            if PAGINATION_PARAMS.contains(&key) {
                continue;
            }
            let column: FilterColumn =
                key.parse().map_err(|_| ValidationError::UnsupportedColumn {
                    column: key.to_string(),
                })?;
            selection.insert_csv(column, value.as_ref());
        }
        Ok(selection)
    }

    /// Adds the values of a comma separated list to a column.
    pub fn insert_csv(&mut self, column: FilterColumn, csv: &str) {
        for value in csv.split(',') {
            self.insert(column, value);
        }
    }

    /// Adds one value to a column. Blank values are ignored.
    pub fn insert(&mut self, column: FilterColumn, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        self.columns
            .entry(column)
            .or_default()
            .insert(value.to_string());
    }

    /// Builder-style variant of [`insert`](Self::insert) for several values.
    pub fn with_values<I, V>(mut self, column: FilterColumn, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        for value in values {
            self.insert(column, value.as_ref());
        }
        self
    }

    /// Returns the selected values for a column, if any.
    pub fn values(&self, column: FilterColumn) -> Option<&BTreeSet<String>> {
        self.columns.get(&column).filter(|v| !v.is_empty())
    }

    /// Iterates the constrained columns in column order.
    pub fn predicates(&self) -> impl Iterator<Item = (FilterColumn, &BTreeSet<String>)> {
        self.columns
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(column, values)| (*column, values))
    }

    /// Returns true if no column is constrained ("match all").
    pub fn is_unconstrained(&self) -> bool {
        self.predicates().next().is_none()
    }

    /// Total number of selected values across all columns.
    pub fn value_count(&self) -> usize {
        self.predicates().map(|(_, values)| values.len()).sum()
    }

    /// Evaluates the selection against a row.
    ///
    /// A constrained column matches only string values that are exactly one
    /// of the selected values.
    pub fn matches(&self, row: &Row) -> bool {
        self.predicates().all(|(column, values)| {
            matches!(row.get(column.as_str()), Some(Value::String(s)) if values.contains(s))
        })
    }
}
