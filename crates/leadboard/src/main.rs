//! Leadboard
//!
//! Serves the `master_table` lead dataset to the dashboard from
//! Elasticsearch, PostgreSQL or an in-memory store.

use clap::Parser;
use leadboard_persistence::backends::memory::MemoryBackend;
use leadboard_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};
use tracing::{info, warn};

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %config.storage_backend,
        auth = config.enable_auth,
        "Starting Leadboard"
    );

    match config.storage_backend {
        StorageBackendMode::Memory => start_memory(config).await,
        StorageBackendMode::Postgres => start_postgres(config).await,
        StorageBackendMode::Elasticsearch => start_elasticsearch(config).await,
    }
}

/// Starts the server with the in-memory backend.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    let backend = match &config.seed_file {
        Some(path) => {
            info!(path = %path.display(), "Initializing in-memory backend from seed file");
            MemoryBackend::from_json_file(path)?
        }
        None => {
            warn!("No seed file configured; the in-memory backend starts empty");
            MemoryBackend::new()
        }
    };

    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Starts the server with the PostgreSQL backend.
#[cfg(feature = "postgres")]
async fn start_postgres(config: ServerConfig) -> anyhow::Result<()> {
    use leadboard_persistence::backends::postgres::PostgresBackend;

    let pg_config = config.postgres_config()?;
    info!(
        host = %pg_config.host,
        port = pg_config.port,
        dbname = %pg_config.dbname,
        max_connections = pg_config.max_connections,
        "Initializing PostgreSQL backend"
    );
    let backend = PostgresBackend::new(pg_config).await?;

    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when postgres feature is not enabled.
#[cfg(not(feature = "postgres"))]
async fn start_postgres(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The postgres backend requires the 'postgres' feature. \
         Build with: cargo build -p leadboard --features postgres"
    )
}

/// Starts the server with the Elasticsearch backend.
#[cfg(feature = "elasticsearch")]
async fn start_elasticsearch(config: ServerConfig) -> anyhow::Result<()> {
    use leadboard_persistence::backends::elasticsearch::ElasticsearchBackend;
    use leadboard_persistence::core::RowStore;

    let es_config = config.elasticsearch_config();
    info!(
        nodes = ?es_config.nodes,
        index = %es_config.index,
        "Initializing Elasticsearch backend"
    );
    let backend = ElasticsearchBackend::new(es_config)?;

    // The cluster may come up after us; readiness reports it until then.
    if let Err(e) = backend.health_check().await {
        warn!(error = %e, "Elasticsearch is not reachable yet");
    }

    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
async fn start_elasticsearch(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The elasticsearch backend requires the 'elasticsearch' feature. \
         Build with: cargo build -p leadboard --features elasticsearch"
    )
}
