//! The allow-list of filterable columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A column of `master_table` that may appear in a filter.
///
/// This enum *is* the allow-list: a name that does not parse into a
/// `FilterColumn` can never reach a query predicate, and every identifier
/// spliced into SQL or Elasticsearch field paths comes from [`as_str`].
///
/// [`as_str`]: FilterColumn::as_str
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterColumn {
    /// Sales region (e.g. "Europe").
    Region,
    /// Company industry.
    Industry,
    /// Contact job title.
    JobTitle,
    /// City/state location.
    Location,
}

impl FilterColumn {
    /// All filterable columns, in display order.
    pub const ALL: [FilterColumn; 4] = [
        FilterColumn::Region,
        FilterColumn::Industry,
        FilterColumn::JobTitle,
        FilterColumn::Location,
    ];

    /// Returns the column name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterColumn::Region => "region",
            FilterColumn::Industry => "industry",
            FilterColumn::JobTitle => "job_title",
            FilterColumn::Location => "location",
        }
    }

    /// Returns the Elasticsearch keyword sub-field (`<column>.keyword`).
    pub fn keyword_field(&self) -> String {
        format!("{}.keyword", self.as_str())
    }

    /// Returns the double-quoted SQL identifier.
    pub fn quoted_identifier(&self) -> String {
        format!("\"{}\"", self.as_str())
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterColumn {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" => Ok(FilterColumn::Region),
            "industry" => Ok(FilterColumn::Industry),
            "job_title" => Ok(FilterColumn::JobTitle),
            "location" => Ok(FilterColumn::Location),
            _ => Err(ValidationError::InvalidColumn {
                column: s.to_string(),
            }),
        }
    }
}
