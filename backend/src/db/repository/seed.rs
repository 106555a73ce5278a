//! Write-side repository trait used to load measurements out of band.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{NewDepthseries, NewTimeseries};

/// Bulk inserts for seeding and tests. The HTTP API never writes.
#[async_trait]
pub trait SeedRepository: Send + Sync {
    /// Insert time series rows, assigning fresh ids.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows inserted
    async fn insert_timeseries(&self, rows: &[NewTimeseries]) -> RepositoryResult<usize>;

    /// Insert depth series rows, assigning fresh ids.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows inserted
    async fn insert_depthseries(&self, rows: &[NewDepthseries]) -> RepositoryResult<usize>;

    /// Remove every measurement row.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows deleted across both tables
    async fn clear_measurements(&self) -> RepositoryResult<usize>;
}
