//! PostgreSQL query builder.
//!
//! Builds SQL for `master_table` using $N parameter placeholders. Column
//! identifiers come only from [`FilterColumn`], so the only text spliced
//! into SQL is drawn from a closed set; every caller-supplied value is bound.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::core::{FILTER_SEARCH_LIMIT, FILTER_VALUES_LIMIT};
use crate::types::{FilterColumn, FilterSelection, SORT_KEY};

/// The dataset table.
pub const TABLE: &str = "master_table";

/// A SQL fragment with associated parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    /// The SQL string with $N placeholders.
    pub sql: String,
    /// The parameter values, in placeholder order.
    pub params: Vec<SqlParam>,
}

/// A SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Integer parameter (`LIMIT`/`OFFSET`).
    Integer(i64),
    /// Keyset cursor, compared against `created_at` in its own type.
    Cursor(CursorTimestamp),
}

/// A keyset cursor as read from the previous page.
///
/// `to_jsonb` renders `timestamptz` values with an offset and `timestamp`
/// values without one. The placeholder is left uncast so the server infers
/// the column's type, and the cursor is encoded to match: an offset-less
/// cursor against a `timestamp` column is compared as the same wall-clock
/// value, never shifted through the session time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorTimestamp {
    /// Cursor carried a UTC offset.
    Zoned(DateTime<Utc>),
    /// Cursor had no offset.
    Naive(NaiveDateTime),
}

impl CursorTimestamp {
    /// Parses a cursor in RFC 3339, the PostgreSQL text form, an
    /// offset-less date-time or a bare date.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Zoned(ts.with_timezone(&Utc)));
        }
        for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
            if let Ok(ts) = DateTime::parse_from_str(raw, format) {
                return Some(Self::Zoned(ts.with_timezone(&Utc)));
            }
        }
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(Self::Naive(ts));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self::Naive)
    }

    /// Value for a `timestamp` column. Zoned cursors use their UTC wall clock.
    pub fn naive(&self) -> NaiveDateTime {
        match self {
            Self::Zoned(ts) => ts.naive_utc(),
            Self::Naive(ts) => *ts,
        }
    }

    /// Value for a `timestamptz` column. Offset-less cursors are read as UTC.
    pub fn zoned(&self) -> DateTime<Utc> {
        match self {
            Self::Zoned(ts) => *ts,
            Self::Naive(ts) => ts.and_utc(),
        }
    }
}

impl SqlParam {
    /// Creates a text parameter.
    pub fn text(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl SqlFragment {
    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Combines two fragments with AND.
    pub fn and(self, other: SqlFragment) -> SqlFragment {
        SqlFragment {
            sql: format!("({}) AND ({})", self.sql, other.sql),
            params: [self.params, other.params].concat(),
        }
    }

    /// Number of the next free placeholder.
    fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }
}

/// Escapes `%`, `_` and `\` so text matches literally inside a LIKE pattern.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn column_ref(column: FilterColumn) -> String {
    format!("m.{}", column.quoted_identifier())
}

fn sort_ref() -> String {
    format!("m.\"{SORT_KEY}\"")
}

/// PostgreSQL query builder for `master_table`.
pub struct PostgresQueryBuilder;

impl PostgresQueryBuilder {
    /// Builds the distinct-values query for a filter column.
    ///
    /// Values are ordered lexicographically. Without a search term up to
    /// 100 values are returned; with one, up to 20 values containing it
    /// (case-insensitive).
    pub fn build_filter_values_query(column: FilterColumn, search: Option<&str>) -> SqlFragment {
        let col = column.quoted_identifier();
        let mut sql = format!(
            "SELECT DISTINCT {col}::text FROM {TABLE} WHERE {col} IS NOT NULL AND {col}::text != ''"
        );
        let mut params = Vec::new();
        let limit = match search {
            Some(search) => {
                sql.push_str(&format!(" AND {col}::text ILIKE $1"));
                params.push(SqlParam::Text(format!("%{}%", escape_like(search))));
                FILTER_SEARCH_LIMIT
            }
            None => FILTER_VALUES_LIMIT,
        };
        sql.push_str(&format!(" ORDER BY 1 LIMIT {limit}"));
        SqlFragment::with_params(sql, params)
    }

    /// Builds the WHERE condition for a selection.
    ///
    /// Each constrained column becomes `m."col" IN ($a, $b, ...)`; columns
    /// are ANDed. Returns `None` when the selection matches every row.
    pub fn build_where(selection: &FilterSelection, param_offset: usize) -> Option<SqlFragment> {
        let mut combined: Option<SqlFragment> = None;
        let mut current_offset = param_offset;

        for (column, values) in selection.predicates() {
            let placeholders: Vec<String> = (0..values.len())
                .map(|i| format!("${}", current_offset + i + 1))
                .collect();
            current_offset += values.len();

            let condition = SqlFragment::with_params(
                format!("{} IN ({})", column_ref(column), placeholders.join(", ")),
                values.iter().map(|v| SqlParam::text(v)).collect(),
            );
            combined = Some(match combined {
                Some(existing) => existing.and(condition),
                None => condition,
            });
        }

        combined
    }

    /// Builds the row and count queries for an offset page.
    ///
    /// Both share the same predicates and parameter numbering; the row
    /// query appends `LIMIT`/`OFFSET` placeholders after them.
    pub fn build_offset_queries(
        selection: &FilterSelection,
        page: u32,
        page_size: u32,
    ) -> (SqlFragment, SqlFragment) {
        let filter = Self::build_where(selection, 0);
        let where_clause = filter
            .as_ref()
            .map(|f| format!(" WHERE {}", f.sql))
            .unwrap_or_default();
        let filter_params = filter.map(|f| f.params).unwrap_or_default();

        let count = SqlFragment::with_params(
            format!("SELECT COUNT(*) FROM {TABLE} m{where_clause}"),
            filter_params.clone(),
        );

        let mut rows = SqlFragment::with_params(
            format!(
                "SELECT to_jsonb(m) FROM {TABLE} m{where_clause} ORDER BY {} DESC",
                sort_ref()
            ),
            filter_params,
        );
        let limit_ph = rows.next_placeholder();
        rows.sql.push_str(&format!(
            " LIMIT ${} OFFSET ${}",
            limit_ph,
            limit_ph + 1
        ));
        let offset = i64::from(page.saturating_sub(1)) * i64::from(page_size);
        rows.params.push(SqlParam::Integer(i64::from(page_size)));
        rows.params.push(SqlParam::Integer(offset));

        (rows, count)
    }

    /// Builds the row query for a keyset page.
    ///
    /// With a cursor, only rows strictly older than it are returned.
    pub fn build_keyset_query(
        selection: &FilterSelection,
        cursor: Option<CursorTimestamp>,
        page_size: u32,
    ) -> SqlFragment {
        let mut filter = Self::build_where(selection, 0);

        if let Some(cursor) = cursor {
            let next = filter.as_ref().map_or(1, |f| f.next_placeholder());
            let condition = SqlFragment::with_params(
                format!("{} < ${next}", sort_ref()),
                vec![SqlParam::Cursor(cursor)],
            );
            filter = Some(match filter {
                Some(existing) => existing.and(condition),
                None => condition,
            });
        }

        let (where_clause, params) = match filter {
            Some(f) => (format!(" WHERE {}", f.sql), f.params),
            None => (String::new(), Vec::new()),
        };
        let mut rows = SqlFragment::with_params(
            format!(
                "SELECT to_jsonb(m) FROM {TABLE} m{where_clause} ORDER BY {} DESC",
                sort_ref()
            ),
            params,
        );
        let limit_ph = rows.next_placeholder();
        rows.sql.push_str(&format!(" LIMIT ${limit_ph}"));
        rows.params.push(SqlParam::Integer(i64::from(page_size)));
        rows
    }
}
