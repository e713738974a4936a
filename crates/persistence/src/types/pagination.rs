//! Pagination types for row listings.
//!
//! Two modes are supported:
//!
//! - **Offset**: a 1-based page number and page size, reported with a total
//!   count and page count.
//! - **Keyset**: an opaque cursor (the sort key of the last row already seen)
//!   and a page size. No total is computed; the next cursor is returned only
//!   when a full page came back.

use serde::Serialize;

use super::row::Row;
use crate::error::ValidationError;

/// Page size used when the request does not carry a usable `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Parses a numeric query parameter leniently.
///
/// Leading whitespace and an optional sign are accepted, then the leading
/// run of digits is read; anything after it is ignored (`"3rd"` is 3).
/// Input without leading digits yields `default`.
pub fn parse_lenient(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return default;
    }
    match digits.parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        // Too many digits: saturate rather than fall back.
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// Number of pages needed for `total` rows, 0 when there are no rows.
pub fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

/// A validated page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// 1-based page number with page size.
    Offset {
        /// Page number, at least 1.
        page: u32,
        /// Rows per page, at least 1.
        page_size: u32,
    },
    /// Rows strictly after `cursor` in sort order.
    Keyset {
        /// Sort key of the last row of the previous page; `None` for the first page.
        cursor: Option<String>,
        /// Rows per page, at least 1.
        page_size: u32,
    },
}

fn check_page_size(page_size: i64) -> Result<u32, ValidationError> {
    if page_size < 1 {
        return Err(ValidationError::InvalidPage {
            message: format!("limit must be >= 1, got {page_size}"),
        });
    }
    Ok(u32::try_from(page_size).unwrap_or(u32::MAX))
}

impl PageRequest {
    /// Creates an offset page request.
    ///
    /// Returns [`ValidationError::InvalidPage`] when `page` or `page_size`
    /// is below 1, or when `page` does not fit in a `u32`.
    pub fn offset(page: i64, page_size: i64) -> Result<Self, ValidationError> {
        if page < 1 {
            return Err(ValidationError::InvalidPage {
                message: format!("page must be >= 1, got {page}"),
            });
        }
        let page = u32::try_from(page).map_err(|_| ValidationError::InvalidPage {
            message: format!("page must be <= {}, got {page}", u32::MAX),
        })?;
        Ok(PageRequest::Offset {
            page,
            page_size: check_page_size(page_size)?,
        })
    }

    /// Creates a keyset page request. A blank cursor means the first page.
    pub fn keyset(cursor: Option<String>, page_size: i64) -> Result<Self, ValidationError> {
        let cursor = cursor
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(PageRequest::Keyset {
            cursor,
            page_size: check_page_size(page_size)?,
        })
    }

    /// Caps the page size at `max`.
    pub fn with_max_page_size(self, max: u32) -> Self {
        let max = max.max(1);
        match self {
            PageRequest::Offset { page, page_size } => PageRequest::Offset {
                page,
                page_size: page_size.min(max),
            },
            PageRequest::Keyset { cursor, page_size } => PageRequest::Keyset {
                cursor,
                page_size: page_size.min(max),
            },
        }
    }

    /// Rows per page.
    pub fn page_size(&self) -> u32 {
        match self {
            PageRequest::Offset { page_size, .. } | PageRequest::Keyset { page_size, .. } => {
                *page_size
            }
        }
    }

    /// Number of rows to skip, for offset requests.
    pub fn offset_value(&self) -> Option<u64> {
        match self {
            PageRequest::Offset { page, page_size } => {
                Some(u64::from(page - 1) * u64::from(*page_size))
            }
            PageRequest::Keyset { .. } => None,
        }
    }

    /// The keyset cursor, if any.
    pub fn cursor(&self) -> Option<&str> {
        match self {
            PageRequest::Keyset { cursor, .. } => cursor.as_deref(),
            PageRequest::Offset { .. } => None,
        }
    }

    /// Returns true for keyset requests.
    pub fn is_keyset(&self) -> bool {
        matches!(self, PageRequest::Keyset { .. })
    }
}

/// One offset page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// Rows of this page, in sort order.
    #[serde(rename = "data")]
    pub rows: Vec<T>,
    /// Rows matching the filter across all pages.
    pub total_count: u64,
    /// `ceil(total_count / page_size)`.
    pub total_pages: u64,
    /// The requested page number.
    pub current_page: u32,
}

impl<T> PageResult<T> {
    /// Assembles a page and derives `total_pages`.
    pub fn new(rows: Vec<T>, total_count: u64, page: u32, page_size: u32) -> Self {
        Self {
            rows,
            total_count,
            total_pages: total_pages(total_count, page_size),
            current_page: page,
        }
    }
}

/// One keyset page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysetPage<T> {
    /// Rows of this page, in sort order.
    #[serde(rename = "data")]
    pub rows: Vec<T>,
    /// Cursor for the following page; absent once a short page is returned.
    pub next_cursor: Option<String>,
    /// Number of rows in `rows`.
    #[serde(rename = "currentPageSize")]
    pub returned_count: usize,
}

impl<T> KeysetPage<T> {
    /// Assembles a keyset page.
    ///
    /// `last_key` is the sort key of the final row; it becomes the next
    /// cursor only if the page is full.
    pub fn new(rows: Vec<T>, page_size: u32, last_key: Option<String>) -> Self {
        let returned_count = rows.len();
        let full = returned_count > 0 && returned_count as u64 >= u64::from(page_size);
        Self {
            rows,
            next_cursor: if full { last_key } else { None },
            returned_count,
        }
    }
}

/// A page of rows in either mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowPage {
    /// Result of an offset request.
    Offset(PageResult<Row>),
    /// Result of a keyset request.
    Keyset(KeysetPage<Row>),
}

impl RowPage {
    /// Rows in this page.
    pub fn rows(&self) -> &[Row] {
        match self {
            RowPage::Offset(page) => &page.rows,
            RowPage::Keyset(page) => &page.rows,
        }
    }

    /// Number of rows in this page.
    pub fn returned_count(&self) -> usize {
        self.rows().len()
    }
}
