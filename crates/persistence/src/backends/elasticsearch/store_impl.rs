//! [`RowStore`] implementation for Elasticsearch.

use async_trait::async_trait;
use elasticsearch::SearchParts;
use elasticsearch::cluster::ClusterHealthParts;
use serde_json::Value;
use tracing::{debug, error};

use super::ElasticsearchBackend;
use super::backend::BACKEND_NAME;
use super::query_builder::{EsQueryBuilder, VALUES_AGGREGATION};
use crate::core::{BackendKind, RowStore, normalize_search};
use crate::error::{StorageError, StorageResult};
use crate::types::{FilterColumn, FilterSelection, KeysetPage, PageResult, Row};

fn query_failed(message: String) -> StorageError {
    error!(backend = BACKEND_NAME, error = %message, "Elasticsearch request failed");
    StorageError::query_failed(BACKEND_NAME, message)
}

/// Text form of a bucket key or sort value.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Hits of a search response: each `_source` with its first sort value.
fn parse_hits(body: &Value) -> Vec<(Row, Option<String>)> {
    body.get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(|h| h.as_array())
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| {
                    let source = hit.get("_source")?.as_object()?.clone();
                    let sort = hit
                        .get("sort")
                        .and_then(|s| s.as_array())
                        .and_then(|s| s.first())
                        .and_then(value_text);
                    Some((source, sort))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `hits.total` is an object (`{"value": n}`) on current clusters and a bare
/// number on older ones or with `rest_total_hits_as_int`.
fn parse_total(body: &Value) -> u64 {
    match body.get("hits").and_then(|h| h.get("total")) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(total) => total.get("value").and_then(|v| v.as_u64()).unwrap_or(0),
        None => 0,
    }
}

fn parse_buckets(body: &Value) -> Vec<String> {
    body.get("aggregations")
        .and_then(|a| a.get(VALUES_AGGREGATION))
        .and_then(|a| a.get("buckets"))
        .and_then(|b| b.as_array())
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|bucket| bucket.get("key").and_then(value_text))
                .collect()
        })
        .unwrap_or_default()
}

impl ElasticsearchBackend {
    /// Sends a search body to the row index and returns the parsed response.
    async fn execute_search(&self, body: Value) -> StorageResult<Value> {
        let index = self.index();
        debug!(index = %index, body = %body, "Executing Elasticsearch search");

        let response = self
            .client()
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(backend = BACKEND_NAME, error = %e, "Elasticsearch unreachable");
                StorageError::unavailable(BACKEND_NAME, format!("Search request failed: {}", e))
            })?;

        let status = response.status_code();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(query_failed(format!("Search returned {}: {}", status, text)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| query_failed(format!("Failed to parse search response: {}", e)))
    }
}

#[async_trait]
impl RowStore for ElasticsearchBackend {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Elasticsearch
    }

    async fn resolve_filter_values(
        &self,
        column: FilterColumn,
        search: Option<&str>,
    ) -> StorageResult<Vec<String>> {
        let body = EsQueryBuilder::build_filter_values(column, normalize_search(search));
        let response = self.execute_search(body).await?;
        Ok(parse_buckets(&response))
    }

    async fn query_offset(
        &self,
        selection: &FilterSelection,
        page: u32,
        page_size: u32,
    ) -> StorageResult<PageResult<Row>> {
        let body = EsQueryBuilder::build_offset(selection, page, page_size);
        let response = self.execute_search(body).await?;

        let rows = parse_hits(&response)
            .into_iter()
            .map(|(row, _)| row)
            .collect();
        Ok(PageResult::new(
            rows,
            parse_total(&response),
            page,
            page_size,
        ))
    }

    async fn query_keyset(
        &self,
        selection: &FilterSelection,
        cursor: Option<&str>,
        page_size: u32,
    ) -> StorageResult<KeysetPage<Row>> {
        let body = EsQueryBuilder::build_keyset(selection, cursor, page_size);
        let response = self.execute_search(body).await?;

        let hits = parse_hits(&response);
        let last_key = hits.last().and_then(|(_, sort)| sort.clone());
        let rows = hits.into_iter().map(|(row, _)| row).collect();
        Ok(KeysetPage::new(rows, page_size, last_key))
    }

    async fn health_check(&self) -> StorageResult<()> {
        let response = self
            .client()
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| {
                StorageError::unavailable(BACKEND_NAME, format!("Health check failed: {}", e))
            })?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(StorageError::unavailable(
                BACKEND_NAME,
                format!("Cluster health returned status {}", status),
            ));
        }

        let body = response.json::<Value>().await.map_err(|e| {
            StorageError::query_failed(
                BACKEND_NAME,
                format!("Failed to parse health response: {}", e),
            )
        })?;

        let cluster_status = body
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");

        if cluster_status == "red" {
            return Err(StorageError::unavailable(
                BACKEND_NAME,
                "Cluster status is red",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_buckets() {
        let body = json!({
            "hits": { "total": { "value": 12, "relation": "eq" }, "hits": [] },
            "aggregations": {
                "unique_values": {
                    "buckets": [
                        { "key": "Europe", "doc_count": 9 },
                        { "key": "Asia", "doc_count": 3 }
                    ]
                }
            }
        });
        assert_eq!(parse_buckets(&body), vec!["Europe", "Asia"]);
        assert!(parse_buckets(&json!({})).is_empty());
    }

    #[test]
    fn test_parse_hits_and_total() {
        let body = json!({
            "hits": {
                "total": { "value": 30, "relation": "eq" },
                "hits": [
                    { "_source": { "id": 1, "region": "Europe" }, "sort": [1704153600000_i64] },
                    { "_source": { "id": 2, "region": "Asia" }, "sort": [1704067200000_i64] },
                    { "_id": "no-source" }
                ]
            }
        });
        let hits = parse_hits(&body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0["region"], "Europe");
        assert_eq!(hits[1].1.as_deref(), Some("1704067200000"));
        assert_eq!(parse_total(&body), 30);
        assert_eq!(parse_total(&json!({"hits": {}})), 0);
    }

    #[test]
    fn test_parse_total_as_int() {
        assert_eq!(parse_total(&json!({"hits": {"total": 42, "hits": []}})), 42);
        assert_eq!(parse_total(&json!({"hits": {"total": "many"}})), 0);
    }
}
