//! Elasticsearch backend implementation.

use std::fmt::Debug;
use std::time::Duration;

use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BackendError, StorageError, StorageResult};

pub(crate) const BACKEND_NAME: &str = "elasticsearch";

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Configuration for the Elasticsearch backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    pub nodes: Vec<String>,

    /// Index holding the rows (default: `"master_table"`).
    #[serde(default = "default_index")]
    pub index: String,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_index() -> String {
    "master_table".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            index: default_index(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

/// Elasticsearch backend for `master_table` rows.
///
/// Holds one client; the HTTP transport pools connections internally, so the
/// backend is shared across requests as-is.
pub struct ElasticsearchBackend {
    client: Elasticsearch,
    config: ElasticsearchConfig,
}

impl Debug for ElasticsearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchBackend")
            .field("nodes", &self.config.nodes)
            .field("index", &self.config.index)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchBackend {
    /// Creates a new Elasticsearch backend with the given configuration.
    ///
    /// No request is made; use [`health_check`] to verify the cluster.
    ///
    /// [`health_check`]: crate::core::RowStore::health_check
    pub fn new(config: ElasticsearchConfig) -> StorageResult<Self> {
        let client = Self::build_client(&config)?;
        info!(
            nodes = ?config.nodes,
            index = %config.index,
            "Elasticsearch backend initialized"
        );
        Ok(Self { client, config })
    }

    /// Builds the Elasticsearch client from configuration.
    fn build_client(config: &ElasticsearchConfig) -> StorageResult<Elasticsearch> {
        let url = config
            .nodes
            .first()
            .cloned()
            .unwrap_or_else(|| "http://localhost:9200".to_string());

        let parsed_url: elasticsearch::http::Url = url.parse().map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("Invalid URL: {}", e),
            })
        })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("Failed to build transport: {}", e),
            })
        })?;

        Ok(Elasticsearch::new(transport))
    }

    /// Returns the Elasticsearch client.
    pub(crate) fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Returns the row index name.
    pub fn index(&self) -> &str {
        &self.config.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: ElasticsearchConfig =
            serde_json::from_str(r#"{"nodes": ["http://es:9200"]}"#).unwrap();
        assert_eq!(config.index, "master_table");
        assert_eq!(config.request_timeout_ms, 30000);
        assert_eq!(config.auth, None);
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let config = ElasticsearchConfig {
            nodes: vec!["not a url".to_string()],
            ..Default::default()
        };
        let err = ElasticsearchBackend::new(config).unwrap_err();
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_new_builds_client_without_network() {
        let config = ElasticsearchConfig {
            auth: Some(ElasticsearchAuth::Basic {
                username: "elastic".to_string(),
                password: "changeme".to_string(),
            }),
            ..Default::default()
        };
        let backend = ElasticsearchBackend::new(config).unwrap();
        assert_eq!(backend.index(), "master_table");
    }
}
