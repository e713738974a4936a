//! Elasticsearch Query DSL builder.
//!
//! Translates filter selections and page requests into search bodies for the
//! `master_table` index.

use serde_json::{Value, json};

use crate::core::FILTER_VALUES_LIMIT;
use crate::types::{FilterColumn, FilterSelection, SORT_KEY};

/// Name of the terms aggregation holding filter values.
pub const VALUES_AGGREGATION: &str = "unique_values";

/// Escapes `*`, `?` and `\` so text matches literally inside a wildcard.
pub fn escape_wildcard(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds search bodies for the row index.
pub struct EsQueryBuilder;

impl EsQueryBuilder {
    /// Builds the filter-values body: no hits, one terms aggregation over
    /// `<column>.keyword` ordered by document count.
    pub fn build_filter_values(column: FilterColumn, search: Option<&str>) -> Value {
        let query = match search {
            Some(search) => json!({
                "wildcard": {
                    column.as_str(): {
                        "value": format!("*{}*", escape_wildcard(search)),
                        "case_insensitive": true
                    }
                }
            }),
            None => json!({ "match_all": {} }),
        };

        json!({
            "size": 0,
            "query": query,
            "aggs": {
                VALUES_AGGREGATION: {
                    "terms": {
                        "field": column.keyword_field(),
                        "size": FILTER_VALUES_LIMIT,
                        "order": { "_count": "desc" }
                    }
                }
            }
        })
    }

    /// Builds the query clause for a selection.
    ///
    /// One `terms` clause per constrained column inside `bool.must`, or
    /// `match_all` when nothing is constrained.
    pub fn build_query(selection: &FilterSelection) -> Value {
        let must: Vec<Value> = selection
            .predicates()
            .map(|(column, values)| {
                json!({ "terms": { column.keyword_field(): values.iter().collect::<Vec<_>>() } })
            })
            .collect();

        if must.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "bool": { "must": must } })
        }
    }

    fn sort() -> Value {
        json!([{ SORT_KEY: { "order": "desc", "unmapped_type": "date" } }])
    }

    /// Builds an offset page body with an exact total.
    pub fn build_offset(selection: &FilterSelection, page: u32, page_size: u32) -> Value {
        let from = u64::from(page.saturating_sub(1)) * u64::from(page_size);
        json!({
            "query": Self::build_query(selection),
            "sort": Self::sort(),
            "from": from,
            "size": page_size,
            "track_total_hits": true
        })
    }

    /// Builds a keyset page body. The cursor is the sort value of the last
    /// hit already returned; `search_after` excludes it.
    pub fn build_keyset(selection: &FilterSelection, cursor: Option<&str>, page_size: u32) -> Value {
        let mut body = json!({
            "query": Self::build_query(selection),
            "sort": Self::sort(),
            "size": page_size,
            "track_total_hits": false
        });
        if let Some(cursor) = cursor {
            body["search_after"] = json!([Self::cursor_value(cursor)]);
        }
        body
    }

    /// Date sort values come back as epoch milliseconds; other cursors are
    /// passed through as strings.
    fn cursor_value(cursor: &str) -> Value {
        match cursor.parse::<i64>() {
            Ok(millis) => json!(millis),
            Err(_) => json!(cursor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_wildcard() {
        assert_eq!(escape_wildcard("eu"), "eu");
        assert_eq!(escape_wildcard("a*b?c\\"), "a\\*b\\?c\\\\");
    }

    #[test]
    fn test_filter_values_match_all() {
        let body = EsQueryBuilder::build_filter_values(FilterColumn::Industry, None);
        assert_eq!(
            body,
            json!({
                "size": 0,
                "query": { "match_all": {} },
                "aggs": {
                    "unique_values": {
                        "terms": {
                            "field": "industry.keyword",
                            "size": 100,
                            "order": { "_count": "desc" }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_filter_values_with_search() {
        let body = EsQueryBuilder::build_filter_values(FilterColumn::Region, Some("eu"));
        assert_eq!(body["query"]["wildcard"]["region"]["value"], "*eu*");
        assert_eq!(body["query"]["wildcard"]["region"]["case_insensitive"], true);
        assert_eq!(body["aggs"]["unique_values"]["terms"]["field"], "region.keyword");
    }

    #[test]
    fn test_query_unconstrained() {
        assert_eq!(
            EsQueryBuilder::build_query(&FilterSelection::new()),
            json!({ "match_all": {} })
        );
    }

    #[test]
    fn test_query_terms() {
        let selection = FilterSelection::new()
            .with_values(FilterColumn::Region, ["Europe", "Asia"])
            .with_values(FilterColumn::Industry, ["Technology"]);
        assert_eq!(
            EsQueryBuilder::build_query(&selection),
            json!({
                "bool": {
                    "must": [
                        { "terms": { "region.keyword": ["Asia", "Europe"] } },
                        { "terms": { "industry.keyword": ["Technology"] } }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_offset_body() {
        let body = EsQueryBuilder::build_offset(&FilterSelection::new(), 3, 25);
        assert_eq!(body["from"], 50);
        assert_eq!(body["size"], 25);
        assert_eq!(body["track_total_hits"], true);
        assert_eq!(
            body["sort"],
            json!([{ "created_at": { "order": "desc", "unmapped_type": "date" } }])
        );
        assert!(body.get("search_after").is_none());
    }

    #[test]
    fn test_keyset_body() {
        let first = EsQueryBuilder::build_keyset(&FilterSelection::new(), None, 10);
        assert!(first.get("search_after").is_none());
        assert!(first.get("from").is_none());

        let next = EsQueryBuilder::build_keyset(&FilterSelection::new(), Some("1704067200000"), 10);
        assert_eq!(next["search_after"], json!([1704067200000_i64]));

        let text = EsQueryBuilder::build_keyset(&FilterSelection::new(), Some("2024-01-01"), 10);
        assert_eq!(text["search_after"], json!(["2024-01-01"]));
    }
}
