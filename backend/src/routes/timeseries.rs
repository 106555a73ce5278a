//! Time series route: parameters, rule table and filter descriptor.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::services::query_params::{QueryParamValidator, ValidationError};

/// Path served by the time series listing.
pub const TIMESERIES_PATH: &str = "/api/v1/timeseries";

/// Route name used in logs.
pub const GET_TIMESERIES: &str = "timeseries";

/// Query parameters accepted by the time series listing.
pub const TIMESERIES_RULES: &[(&str, &str)] = &[("start_date", "date"), ("end_date", "date")];

/// Inclusive timestamp window. `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesFilter {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeseriesFilter {
    pub fn contains(&self, datetime: &NaiveDateTime) -> bool {
        self.start.map_or(true, |start| *datetime >= start)
            && self.end.map_or(true, |end| *datetime <= end)
    }
}

/// Validate the raw query and turn it into a filter.
pub fn build_filter(query: &HashMap<String, String>) -> Result<TimeseriesFilter, ValidationError> {
    let params = QueryParamValidator::with_rules(query, TIMESERIES_RULES).validate()?;

    let filter = TimeseriesFilter {
        start: params.date("start_date"),
        end: params.date("end_date"),
    };

    if let (Some(start), Some(end)) = (filter.start, filter.end) {
        if start > end {
            return Err(ValidationError::InvalidRange(
                "start_date cannot be later than end_date".to_string(),
            ));
        }
    }

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_no_params_is_unbounded() {
        let filter = build_filter(&HashMap::new()).unwrap();
        assert_eq!(filter, TimeseriesFilter::default());
        assert!(filter.contains(&midnight(1900, 1, 1)));
        assert!(filter.contains(&midnight(2999, 12, 31)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = build_filter(&query(&[
            ("start_date", "2020-01-01"),
            ("end_date", "2020-12-31"),
        ]))
        .unwrap();

        assert!(filter.contains(&midnight(2020, 1, 1)));
        assert!(filter.contains(&midnight(2020, 12, 31)));
        assert!(!filter.contains(&midnight(2019, 12, 31)));
        assert!(!filter.contains(&midnight(2021, 1, 1)));
    }

    #[test]
    fn test_equal_bounds_are_accepted() {
        let filter = build_filter(&query(&[
            ("start_date", "2020-06-15"),
            ("end_date", "2020-06-15"),
        ]))
        .unwrap();
        assert_eq!(filter.start, filter.end);
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let err = build_filter(&query(&[
            ("start_date", "2020-01-02"),
            ("end_date", "2020-01-01"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRange("start_date cannot be later than end_date".to_string())
        );
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let err = build_filter(&query(&[("start_date", "2002-03-0d")])).unwrap_err();
        assert!(matches!(err, ValidationError::Fields(ref msgs) if msgs.len() == 1));
    }

    #[test]
    fn test_one_sided_window() {
        let filter = build_filter(&query(&[("end_date", "2010-05-05")])).unwrap();
        assert_eq!(filter.start, None);
        assert!(filter.contains(&midnight(1970, 1, 1)));
        assert!(!filter.contains(&midnight(2010, 5, 6)));
    }
}
