//! HTTP test harness.
//!
//! Builds a [`TestServer`] over the full application router.

use async_trait::async_trait;
use axum_test::TestServer;
use leadboard_persistence::backends::memory::MemoryBackend;
use leadboard_persistence::core::{BackendKind, RowStore};
use leadboard_persistence::error::{StorageError, StorageResult};
use leadboard_persistence::types::{FilterColumn, FilterSelection, KeysetPage, PageResult, Row};
use leadboard_rest::{ServerConfig, create_app_with_config};

use super::fixtures::lead_rows;

/// Secret used by servers built with [`auth_config`].
pub const TEST_SECRET: &str = "test-secret";

/// Test configuration with session tokens required.
pub fn auth_config() -> ServerConfig {
    ServerConfig {
        enable_auth: true,
        jwt_secret: Some(TEST_SECRET.to_string()),
        ..ServerConfig::for_testing()
    }
}

/// Starts a server over `count` fixture rows with the given configuration.
///
/// The returned backend shares its rows with the server.
pub fn create_test_server_with(count: usize, config: ServerConfig) -> (TestServer, MemoryBackend) {
    let backend = MemoryBackend::from_values(lead_rows(count)).expect("Failed to seed rows");
    let app = create_app_with_config(backend.clone(), config);
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, backend)
}

/// Starts a server over `count` fixture rows without authentication.
pub fn create_test_server(count: usize) -> TestServer {
    create_test_server_with(count, ServerConfig::for_testing()).0
}

/// A store whose every query fails as if the backend were down.
#[derive(Debug)]
pub struct FailingStore;

fn down() -> StorageError {
    StorageError::unavailable("memory", "connection refused by 10.0.0.7:9200")
}

#[async_trait]
impl RowStore for FailingStore {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn resolve_filter_values(
        &self,
        _column: FilterColumn,
        _search: Option<&str>,
    ) -> StorageResult<Vec<String>> {
        Err(down())
    }

    async fn query_offset(
        &self,
        _selection: &FilterSelection,
        _page: u32,
        _page_size: u32,
    ) -> StorageResult<PageResult<Row>> {
        Err(down())
    }

    async fn query_keyset(
        &self,
        _selection: &FilterSelection,
        _cursor: Option<&str>,
        _page_size: u32,
    ) -> StorageResult<KeysetPage<Row>> {
        Err(down())
    }

    async fn health_check(&self) -> StorageResult<()> {
        Err(down())
    }
}

/// Starts a server whose backend always fails.
pub fn create_failing_server() -> TestServer {
    let app = create_app_with_config(FailingStore, ServerConfig::for_testing());
    TestServer::new(app).expect("Failed to create test server")
}
