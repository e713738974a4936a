//! [`RowStore`] implementation for PostgreSQL.

use std::error::Error;

use async_trait::async_trait;
use bytes::BytesMut;
use postgres_types::{IsNull, ToSql, Type, to_sql_checked};
use serde_json::Value;
use tracing::{debug, error};

use super::PostgresBackend;
use super::backend::BACKEND_NAME;
use super::query_builder::{CursorTimestamp, PostgresQueryBuilder, SqlFragment, SqlParam};
use crate::core::{BackendKind, RowStore, normalize_search};
use crate::error::{StorageError, StorageResult, ValidationError};
use crate::types::{
    FilterColumn, FilterSelection, KeysetPage, PageResult, Row, SORT_KEY, row_sort_key,
};

fn query_failed(context: &str, e: impl std::fmt::Display) -> StorageError {
    error!(backend = BACKEND_NAME, error = %e, "{context}");
    StorageError::query_failed(BACKEND_NAME, format!("{context}: {e}"))
}

impl ToSql for CursorTimestamp {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        if *ty == Type::TIMESTAMP {
            self.naive().to_sql(ty, out)
        } else {
            self.zoned().to_sql(ty, out)
        }
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::TIMESTAMP || *ty == Type::TIMESTAMPTZ
    }

    to_sql_checked!();
}

fn bind_params(params: &[SqlParam]) -> Vec<Box<dyn ToSql + Sync + Send>> {
    params
        .iter()
        .map(|param| -> Box<dyn ToSql + Sync + Send> {
            match param {
                SqlParam::Text(s) => Box::new(s.clone()),
                SqlParam::Integer(i) => Box::new(*i),
                SqlParam::Cursor(cursor) => Box::new(*cursor),
            }
        })
        .collect()
}

async fn run_query(
    client: &deadpool_postgres::Client,
    fragment: &SqlFragment,
) -> Result<Vec<tokio_postgres::Row>, tokio_postgres::Error> {
    let params = bind_params(&fragment.params);
    let param_refs: Vec<&(dyn ToSql + Sync)> = params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect();
    client.query(fragment.sql.as_str(), &param_refs).await
}

fn decode_rows(rows: &[tokio_postgres::Row]) -> StorageResult<Vec<Row>> {
    rows.iter()
        .map(|row| {
            let value: Value = row
                .try_get(0)
                .map_err(|e| query_failed("Failed to decode row", e))?;
            match value {
                Value::Object(map) => Ok(map),
                other => Err(query_failed(
                    "Failed to decode row",
                    format!("expected a JSON object, got {other}"),
                )),
            }
        })
        .collect()
}

#[async_trait]
impl RowStore for PostgresBackend {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Postgres
    }

    async fn resolve_filter_values(
        &self,
        column: FilterColumn,
        search: Option<&str>,
    ) -> StorageResult<Vec<String>> {
        let query =
            PostgresQueryBuilder::build_filter_values_query(column, normalize_search(search));
        debug!(column = %column, sql = %query.sql, "Resolving filter values");

        let client = self.get_client().await?;
        let rows = run_query(&client, &query)
            .await
            .map_err(|e| query_failed("Failed to fetch filter values", e))?;

        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let value: Option<String> = row
                .try_get(0)
                .map_err(|e| query_failed("Failed to decode filter value", e))?;
            values.extend(value);
        }
        Ok(values)
    }

    async fn query_offset(
        &self,
        selection: &FilterSelection,
        page: u32,
        page_size: u32,
    ) -> StorageResult<PageResult<Row>> {
        let (rows_query, count_query) =
            PostgresQueryBuilder::build_offset_queries(selection, page, page_size);
        debug!(sql = %rows_query.sql, params = rows_query.params.len(), "Executing offset query");

        // Both statements run on the same pooled connection.
        let client = self.get_client().await?;
        let rows = run_query(&client, &rows_query)
            .await
            .map_err(|e| query_failed("Failed to fetch rows", e))?;
        let count_rows = run_query(&client, &count_query)
            .await
            .map_err(|e| query_failed("Failed to count rows", e))?;

        let total: i64 = match count_rows.first() {
            Some(row) => row
                .try_get(0)
                .map_err(|e| query_failed("Failed to decode row count", e))?,
            None => 0,
        };

        let rows = decode_rows(&rows)?;
        Ok(PageResult::new(
            rows,
            u64::try_from(total).unwrap_or(0),
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
        let cursor = match cursor {
            Some(raw) => Some(CursorTimestamp::parse(raw).ok_or_else(|| {
                ValidationError::InvalidCursor {
                    cursor: raw.to_string(),
                }
            })?),
            None => None,
        };

        let query = PostgresQueryBuilder::build_keyset_query(selection, cursor, page_size);
        debug!(sql = %query.sql, params = query.params.len(), "Executing keyset query");

        let client = self.get_client().await?;
        let rows = run_query(&client, &query)
            .await
            .map_err(|e| query_failed("Failed to fetch rows", e))?;

        let rows = decode_rows(&rows)?;
        let last_key = rows.last().and_then(|row| row_sort_key(row, SORT_KEY));
        Ok(KeysetPage::new(rows, page_size, last_key))
    }

    async fn health_check(&self) -> StorageResult<()> {
        let client = self.get_client().await?;
        client.query_one("SELECT 1", &[]).await.map_err(|e| {
            StorageError::unavailable(BACKEND_NAME, format!("Health check failed: {}", e))
        })?;
        Ok(())
    }
}
