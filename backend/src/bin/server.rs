//! Measurements HTTP Server Binary
//!
//! Resolves the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with local (in-memory) repository (default)
//! cargo run --bin measurements-server
//!
//! # Run with PostgreSQL repository
//! PG_USER=postgres PG_DBNAME=measurements \
//!   cargo run --bin measurements-server --features postgres-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 6543)
//! - `CORS_ENABLED`: Attach permissive CORS headers (default: off)
//! - `REPOSITORY_TYPE`: `local` or `postgres`
//! - `DATABASE_URL`, `PG_*`: Postgres connection settings
//! - `RUST_LOG`: Log filter (default: info)

use tracing::info;
use tracing_subscriber::EnvFilter;

use measurements_api::db::RepositoryFactory;
use measurements_api::http::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting measurements HTTP server");

    let config = ServerConfig::from_env().map_err(anyhow::Error::msg)?;

    let repository = RepositoryFactory::resolve().await?;
    info!("Repository initialized successfully");

    let app = create_router(AppState::new(repository), config.cors_enabled);

    let addr = config.socket_addr()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);
    if config.cors_enabled {
        info!("CORS enabled for all origins");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
