//! Random measurement generation for seeding a repository.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::info;
use rand::Rng;

use crate::api::{NewDepthseries, NewTimeseries};
use crate::db::repository::{RepositoryResult, SeedRepository};

/// Depths are drawn from this many grid steps so duplicates show up.
const DEPTH_GRID_STEPS: u32 = 50;
const DEPTH_GRID_SPACING: f64 = 0.5;

/// Share of depth series rows stored without a value.
const NULL_VALUE_PROBABILITY: f64 = 0.1;

fn seed_window() -> (NaiveDateTime, NaiveDateTime) {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or_default();
    (start, end)
}

/// Time series rows with timestamps in 2000-01-01..=2024-12-31 and
/// whole-number values below 1000.
pub fn random_timeseries<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<NewTimeseries> {
    let (start, end) = seed_window();
    let span = (end - start).num_seconds();

    (0..count)
        .map(|_| NewTimeseries {
            datetime: start + Duration::seconds(rng.gen_range(0..=span)),
            value: rng.gen_range(0..1000) as f64,
        })
        .collect()
}

/// Depth series rows on a coarse depth grid, some without a value.
pub fn random_depthseries<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<NewDepthseries> {
    (0..count)
        .map(|_| {
            let depth = rng.gen_range(0..DEPTH_GRID_STEPS) as f64 * DEPTH_GRID_SPACING;
            let value = if rng.gen_bool(NULL_VALUE_PROBABILITY) {
                None
            } else {
                Some((rng.gen_range(0.0..100.0) * 100.0_f64).round() / 100.0)
            };
            NewDepthseries { depth, value }
        })
        .collect()
}

/// Counts written by [`seed_repository`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub timeseries: usize,
    pub depthseries: usize,
}

/// Insert freshly generated rows into `repo`.
pub async fn seed_repository<S: SeedRepository + ?Sized>(
    repo: &S,
    timeseries_rows: usize,
    depthseries_rows: usize,
) -> RepositoryResult<SeedSummary> {
    let (timeseries, depthseries) = {
        let mut rng = rand::thread_rng();
        (
            random_timeseries(&mut rng, timeseries_rows),
            random_depthseries(&mut rng, depthseries_rows),
        )
    };

    let summary = SeedSummary {
        timeseries: repo.insert_timeseries(&timeseries).await?,
        depthseries: repo.insert_depthseries(&depthseries).await?,
    };
    info!(
        "Seeded {} timeseries and {} depthseries rows",
        summary.timeseries, summary.depthseries
    );
    Ok(summary)
}
