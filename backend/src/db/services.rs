//! Service layer for measurement reads.
//!
//! Handlers call these instead of the repository traits directly so that
//! logging stays in one place regardless of the backing store.

use crate::api::{DepthseriesFilter, DepthseriesRecord, TimeseriesFilter, TimeseriesRecord};

use super::repository::{MeasurementRepository, RepositoryResult};

/// Check database connectivity.
pub async fn health_check<R: MeasurementRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Time series rows inside the filter window, oldest first.
pub async fn list_timeseries<R: MeasurementRepository + ?Sized>(
    repo: &R,
    filter: &TimeseriesFilter,
) -> RepositoryResult<Vec<TimeseriesRecord>> {
    log::debug!("Listing timeseries with {:?}", filter);
    let rows = repo.fetch_timeseries(filter).await?;
    log::debug!("Fetched {} timeseries rows", rows.len());
    Ok(rows)
}

/// One non-null depth series row per depth inside the filter range.
pub async fn list_depthseries<R: MeasurementRepository + ?Sized>(
    repo: &R,
    filter: &DepthseriesFilter,
) -> RepositoryResult<Vec<DepthseriesRecord>> {
    log::debug!("Listing depthseries with {:?}", filter);
    let rows = repo.fetch_depthseries(filter).await?;
    log::debug!("Fetched {} distinct depthseries rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NewDepthseries;
    use crate::db::repository::SeedRepository;
    use crate::db::LocalRepository;

    #[tokio::test]
    async fn test_list_depthseries_applies_bounds() {
        let repo = LocalRepository::new();
        let rows: Vec<NewDepthseries> = [0.5, 1.0, 1.5, 2.0]
            .iter()
            .map(|&depth| NewDepthseries {
                depth,
                value: Some(depth * 10.0),
            })
            .collect();
        repo.insert_depthseries(&rows).await.unwrap();

        let filter = DepthseriesFilter {
            min_depth: Some(1.0),
            max_depth: Some(1.5),
        };
        let out = list_depthseries(&repo, &filter).await.unwrap();
        let depths: Vec<f64> = out.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![1.0, 1.5]);
    }

    #[tokio::test]
    async fn test_health_check_reports_local_state() {
        let repo = LocalRepository::new();
        assert!(health_check(&repo).await.unwrap());
        repo.set_healthy(false);
        assert!(!health_check(&repo).await.unwrap());
    }
}
