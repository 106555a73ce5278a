//! Read-side repository trait for measurement queries.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{DepthseriesFilter, DepthseriesRecord, TimeseriesFilter, TimeseriesRecord};

/// Repository trait for filtered measurement reads.
///
/// Filters arrive already validated; implementations only translate them into
/// their storage engine's query language.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch time series rows whose timestamp falls inside the filter window.
    ///
    /// Both bounds are inclusive; a missing bound is open. Rows are returned in
    /// ascending `datetime` order, ties broken by id.
    async fn fetch_timeseries(
        &self,
        filter: &TimeseriesFilter,
    ) -> RepositoryResult<Vec<TimeseriesRecord>>;

    /// Fetch depth series rows with a non-null value, one per distinct depth.
    ///
    /// Among rows sharing a depth the one with the lowest id is kept. Rows are
    /// returned in ascending depth order.
    async fn fetch_depthseries(
        &self,
        filter: &DepthseriesFilter,
    ) -> RepositoryResult<Vec<DepthseriesRecord>>;
}
