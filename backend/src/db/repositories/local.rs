//! In-memory repository for unit testing and local development.
//!
//! Rows live in plain vectors behind a `parking_lot::RwLock`. Reads apply the
//! same filtering and distinct-depth rules as the SQL backend so handlers
//! behave identically against either store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::api::{
    DepthseriesFilter, DepthseriesRecord, DepthseriesRow, MeasurementId, NewDepthseries,
    NewTimeseries, TimeseriesFilter, TimeseriesRecord,
};
use crate::db::repository::{
    ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult, SeedRepository,
};
use crate::routes::depthseries::select_distinct_depths;

#[derive(Debug, Default)]
struct LocalData {
    timeseries: Vec<TimeseriesRecord>,
    depthseries: Vec<DepthseriesRow>,
}

/// In-memory measurement store.
///
/// Cloning is cheap and clones share the same tables.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    healthy: Arc<RwLock<bool>>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            healthy: Arc::new(RwLock::new(true)),
        }
    }

    /// Simulate a lost connection. Every operation fails while unhealthy.
    pub fn set_healthy(&self, healthy: bool) {
        *self.healthy.write() = healthy;
    }

    /// Insert rows with explicit ids, e.g. to pin the distinct-depth tie-break.
    pub fn insert_depthseries_rows(&self, rows: impl IntoIterator<Item = DepthseriesRow>) {
        self.data.write().depthseries.extend(rows);
    }

    /// Insert time series rows with explicit ids.
    pub fn insert_timeseries_rows(&self, rows: impl IntoIterator<Item = TimeseriesRecord>) {
        self.data.write().timeseries.extend(rows);
    }

    pub fn timeseries_count(&self) -> usize {
        self.data.read().timeseries.len()
    }

    pub fn depthseries_count(&self) -> usize {
        self.data.read().depthseries.len()
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if *self.healthy.read() {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository is marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeasurementRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(*self.healthy.read())
    }

    async fn fetch_timeseries(
        &self,
        filter: &TimeseriesFilter,
    ) -> RepositoryResult<Vec<TimeseriesRecord>> {
        self.ensure_healthy("fetch_timeseries")?;

        let mut rows: Vec<TimeseriesRecord> = self
            .data
            .read()
            .timeseries
            .iter()
            .filter(|row| filter.contains(&row.datetime))
            .cloned()
            .collect();

        rows.sort_by(|a, b| a.datetime.cmp(&b.datetime).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn fetch_depthseries(
        &self,
        filter: &DepthseriesFilter,
    ) -> RepositoryResult<Vec<DepthseriesRecord>> {
        self.ensure_healthy("fetch_depthseries")?;

        let rows = self.data.read().depthseries.clone();
        Ok(select_distinct_depths(rows, filter))
    }
}

#[async_trait]
impl SeedRepository for LocalRepository {
    async fn insert_timeseries(&self, rows: &[NewTimeseries]) -> RepositoryResult<usize> {
        self.ensure_healthy("insert_timeseries")?;

        let mut data = self.data.write();
        data.timeseries.extend(rows.iter().map(|r| TimeseriesRecord {
            id: MeasurementId::generate(),
            datetime: r.datetime,
            value: r.value,
        }));
        Ok(rows.len())
    }

    async fn insert_depthseries(&self, rows: &[NewDepthseries]) -> RepositoryResult<usize> {
        self.ensure_healthy("insert_depthseries")?;

        let mut data = self.data.write();
        data.depthseries.extend(rows.iter().map(|r| DepthseriesRow {
            id: MeasurementId::generate(),
            depth: r.depth,
            value: r.value,
        }));
        Ok(rows.len())
    }

    async fn clear_measurements(&self) -> RepositoryResult<usize> {
        self.ensure_healthy("clear_measurements")?;

        let mut data = self.data.write();
        let removed = data.timeseries.len() + data.depthseries.len();
        data.timeseries.clear();
        data.depthseries.clear();
        Ok(removed)
    }
}
