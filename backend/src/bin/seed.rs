//! Populate the configured repository with random measurements.
//!
//! # Environment Variables
//!
//! - `SEED_TIMESERIES_ROWS`: Time series rows to insert (default: 100)
//! - `SEED_DEPTHSERIES_ROWS`: Depth series rows to insert (default: 100)
//! - `SEED_CLEAR`: Truthy to delete existing rows first
//! - Repository selection as for the server (`REPOSITORY_TYPE`, `DATABASE_URL`, `PG_*`)
//!
//! Against the in-memory repository this only exercises the generator, since
//! the data is gone when the process exits.

use std::env;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use measurements_api::db::config::is_truthy;
use measurements_api::db::{RepositoryFactory, SeedRepository};
use measurements_api::services::seed_repository;

const DEFAULT_ROWS: usize = 100;

fn rows_from_env(key: &str) -> anyhow::Result<usize> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, raw)),
        Err(_) => Ok(DEFAULT_ROWS),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let timeseries_rows = rows_from_env("SEED_TIMESERIES_ROWS")?;
    let depthseries_rows = rows_from_env("SEED_DEPTHSERIES_ROWS")?;

    let repository = RepositoryFactory::resolve()
        .await
        .context("Failed to initialize repository")?;

    if env::var("SEED_CLEAR").map_or(false, |v| is_truthy(&v)) {
        let removed = repository.clear_measurements().await?;
        info!("Removed {} existing rows", removed);
    }

    let summary = seed_repository(repository.as_ref(), timeseries_rows, depthseries_rows).await?;
    info!(
        "Seeded {} timeseries and {} depthseries rows",
        summary.timeseries, summary.depthseries
    );

    Ok(())
}
