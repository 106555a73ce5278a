//! Depth series routes: listing and CSV download.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::{DepthseriesRecord, DepthseriesRow};
use crate::services::query_params::{QueryParamValidator, ValidationError};

/// Path served by the depth series listing.
pub const DEPTHSERIES_PATH: &str = "/api/v1/depthseries";

/// Path served by the depth series CSV download.
pub const DEPTHSERIES_DOWNLOAD_PATH: &str = "/api/v1/depthseries/download";

pub const GET_DEPTHSERIES: &str = "depthseries";
pub const DOWNLOAD_DEPTHSERIES: &str = "depthseries_download";

/// Query parameters accepted by the CSV download.
pub const DOWNLOAD_RULES: &[(&str, &str)] = &[("min_depth", "float"), ("max_depth", "float")];

/// Inclusive depth range. `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthseriesFilter {
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
}

impl DepthseriesFilter {
    pub fn contains(&self, depth: f64) -> bool {
        self.min_depth.map_or(true, |min| depth >= min)
            && self.max_depth.map_or(true, |max| depth <= max)
    }
}

/// Validate the download query and turn it into a filter.
pub fn build_download_filter(
    query: &HashMap<String, String>,
) -> Result<DepthseriesFilter, ValidationError> {
    let params = QueryParamValidator::with_rules(query, DOWNLOAD_RULES).validate()?;

    let filter = DepthseriesFilter {
        min_depth: params.float("min_depth"),
        max_depth: params.float("max_depth"),
    };

    if let (Some(min), Some(max)) = (filter.min_depth, filter.max_depth) {
        if min > max {
            return Err(ValidationError::InvalidRange(
                "min_depth cannot be greater than max_depth".to_string(),
            ));
        }
    }

    Ok(filter)
}

/// Keep rows inside `filter` with a value, one per depth, lowest id first.
///
/// Output is sorted by ascending depth. Stores without a native
/// `DISTINCT ON` use this to match the SQL backend row for row.
pub fn select_distinct_depths<I>(rows: I, filter: &DepthseriesFilter) -> Vec<DepthseriesRecord>
where
    I: IntoIterator<Item = DepthseriesRow>,
{
    let mut records: Vec<DepthseriesRecord> = rows
        .into_iter()
        .filter(|row| filter.contains(row.depth))
        .filter_map(DepthseriesRow::into_record)
        .collect();

    records.sort_by(|a, b| match a.depth.total_cmp(&b.depth) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
    // NaN depths group together, as they do under Postgres DISTINCT ON
    records.dedup_by(|next, kept| {
        next.depth == kept.depth || (next.depth.is_nan() && kept.depth.is_nan())
    });
    records
}
