//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! Connection settings are described on [`PostgresConfig`].

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use uuid::Uuid;

use crate::api::{
    DepthseriesFilter, DepthseriesRecord, DepthseriesRow, NewDepthseries, NewTimeseries,
    TimeseriesFilter, TimeseriesRecord,
};
use crate::db::config::PostgresConfig;
use crate::db::repository::{
    ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult, SeedRepository,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Rows per INSERT statement; keeps bind parameters well below the Postgres limit.
const INSERT_CHUNK_SIZE: usize = 1000;

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// Blocks while the pool connects; call from `spawn_blocking` inside a runtime.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let url = config.connection_url().map_err(RepositoryError::configuration)?;
        log::info!("Connecting to Postgres at {}", config.display_url());

        let manager = ConnectionManager::<PgConnection>::new(url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        if !applied.is_empty() {
            log::info!("Applied {} pending migration(s)", applied.len());
        }
        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries up to `max_retries` times on retryable errors, doubling the
    /// delay after each attempt.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            log::warn!("{}; retrying", err);
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        log::warn!("{}; retrying", e);
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Returns (is_healthy, latency_ms, error_message).
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        let result = self.health_check().await;
        let latency = Some(start.elapsed().as_millis() as u64);
        match result {
            Ok(true) => (true, latency, None),
            Ok(false) => (
                false,
                latency,
                Some("Health check returned false".to_string()),
            ),
            Err(e) => (false, latency, Some(e.to_string())),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

#[async_trait]
impl MeasurementRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn fetch_timeseries(
        &self,
        filter: &TimeseriesFilter,
    ) -> RepositoryResult<Vec<TimeseriesRecord>> {
        let filter = *filter;
        self.with_conn(move |conn| {
            let mut query = timeseries::table
                .select(TimeseriesDbRow::as_select())
                .into_boxed();

            if let Some(start) = filter.start {
                query = query.filter(timeseries::datetime.ge(start));
            }
            if let Some(end) = filter.end {
                query = query.filter(timeseries::datetime.le(end));
            }

            let rows = query
                .order((timeseries::datetime.asc(), timeseries::id.asc()))
                .load::<TimeseriesDbRow>(conn)
                .map_err(|e| map_diesel_error(e).with_operation("fetch_timeseries"))?;

            Ok(rows.into_iter().map(TimeseriesRecord::from).collect())
        })
        .await
    }

    async fn fetch_depthseries(
        &self,
        filter: &DepthseriesFilter,
    ) -> RepositoryResult<Vec<DepthseriesRecord>> {
        let filter = *filter;
        self.with_conn(move |conn| {
            let mut query = depthseries::table
                .filter(depthseries::value.is_not_null())
                .distinct_on(depthseries::depth)
                .order((depthseries::depth.asc(), depthseries::id.asc()))
                .select(DepthseriesDbRow::as_select())
                .into_boxed();

            if let Some(min_depth) = filter.min_depth {
                query = query.filter(depthseries::depth.ge(min_depth));
            }
            if let Some(max_depth) = filter.max_depth {
                query = query.filter(depthseries::depth.le(max_depth));
            }

            let rows = query
                .load::<DepthseriesDbRow>(conn)
                .map_err(|e| map_diesel_error(e).with_operation("fetch_depthseries"))?;

            Ok(rows
                .into_iter()
                .map(DepthseriesRow::from)
                .filter_map(DepthseriesRow::into_record)
                .collect())
        })
        .await
    }
}

#[async_trait]
impl SeedRepository for PostgresRepository {
    async fn insert_timeseries(&self, rows: &[NewTimeseries]) -> RepositoryResult<usize> {
        let rows: Vec<TimeseriesDbRow> = rows
            .iter()
            .map(|r| TimeseriesDbRow {
                id: Uuid::new_v4(),
                datetime: r.datetime,
                value: r.value,
            })
            .collect();

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
                    inserted += diesel::insert_into(timeseries::table)
                        .values(chunk)
                        .execute(tx)?;
                }
                Ok(inserted)
            })
            .map_err(|e: diesel::result::Error| {
                map_diesel_error(e).with_operation("insert_timeseries")
            })
        })
        .await
    }

    async fn insert_depthseries(&self, rows: &[NewDepthseries]) -> RepositoryResult<usize> {
        let rows: Vec<DepthseriesDbRow> = rows
            .iter()
            .map(|r| DepthseriesDbRow {
                id: Uuid::new_v4(),
                depth: r.depth,
                value: r.value,
            })
            .collect();

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
                    inserted += diesel::insert_into(depthseries::table)
                        .values(chunk)
                        .execute(tx)?;
                }
                Ok(inserted)
            })
            .map_err(|e: diesel::result::Error| {
                map_diesel_error(e).with_operation("insert_depthseries")
            })
        })
        .await
    }

    async fn clear_measurements(&self) -> RepositoryResult<usize> {
        self.with_conn(|conn| {
            conn.transaction(|tx| {
                let ts = diesel::delete(timeseries::table).execute(tx)?;
                let ds = diesel::delete(depthseries::table).execute(tx)?;
                Ok(ts + ds)
            })
            .map_err(|e: diesel::result::Error| {
                map_diesel_error(e).with_operation("clear_measurements")
            })
        })
        .await
    }
}
