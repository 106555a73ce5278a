//! Property tests for range filtering over the in-memory repository.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use measurements_api::api::{DepthseriesFilter, NewDepthseries, NewTimeseries, TimeseriesFilter};
use measurements_api::db::{LocalRepository, MeasurementRepository, SeedRepository};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_timeseries_window_is_inclusive(
        offsets in prop::collection::vec(0i64..1000, 0..60),
        a in 0i64..1000,
        b in 0i64..1000,
    ) {
        let (lo, hi) = (a.min(b), a.max(b));
        let start = base() + Duration::days(lo);
        let end = base() + Duration::days(hi);

        let rows: Vec<NewTimeseries> = offsets
            .iter()
            .map(|&d| NewTimeseries { datetime: base() + Duration::days(d), value: d as f64 })
            .collect();

        let repo = LocalRepository::new();
        let filter = TimeseriesFilter { start: Some(start), end: Some(end) };
        let out = runtime().block_on(async {
            repo.insert_timeseries(&rows).await.unwrap();
            repo.fetch_timeseries(&filter).await.unwrap()
        });

        let expected = offsets.iter().filter(|&&d| d >= lo && d <= hi).count();
        prop_assert_eq!(out.len(), expected);
        prop_assert!(out.iter().all(|r| r.datetime >= start && r.datetime <= end));
        prop_assert!(out.windows(2).all(|w| w[0].datetime <= w[1].datetime));
    }

    #[test]
    fn prop_depthseries_bounds_and_distinct(
        rows in prop::collection::vec((0u32..40, prop::option::of(0.0f64..100.0)), 0..80),
        a in 0u32..40,
        b in 0u32..40,
    ) {
        let (lo, hi) = (a.min(b) as f64 * 0.5, a.max(b) as f64 * 0.5);
        let rows: Vec<NewDepthseries> = rows
            .into_iter()
            .map(|(step, value)| NewDepthseries { depth: step as f64 * 0.5, value })
            .collect();

        let repo = LocalRepository::new();
        let filter = DepthseriesFilter { min_depth: Some(lo), max_depth: Some(hi) };
        let out = runtime().block_on(async {
            repo.insert_depthseries(&rows).await.unwrap();
            repo.fetch_depthseries(&filter).await.unwrap()
        });

        let mut expected: Vec<f64> = rows
            .iter()
            .filter(|r| r.value.is_some() && r.depth >= lo && r.depth <= hi)
            .map(|r| r.depth)
            .collect();
        expected.sort_by(f64::total_cmp);
        expected.dedup();

        let depths: Vec<f64> = out.iter().map(|r| r.depth).collect();
        prop_assert_eq!(depths, expected);
    }
}
