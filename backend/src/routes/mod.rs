//! Route definitions: paths, accepted parameters and the filter each route
//! builds from them.

pub mod depthseries;
pub mod timeseries;

/// Health check path.
pub const HEALTH_PATH: &str = "/health";

/// Every path the router serves. Used for "did you mean" suggestions on 404.
pub const ROUTE_PATTERNS: &[&str] = &[
    HEALTH_PATH,
    timeseries::TIMESERIES_PATH,
    depthseries::DEPTHSERIES_PATH,
    depthseries::DEPTHSERIES_DOWNLOAD_PATH,
];

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_structure() {
        assert_eq!(super::timeseries::TIMESERIES_PATH, "/api/v1/timeseries");
        assert_eq!(super::depthseries::DEPTHSERIES_PATH, "/api/v1/depthseries");
        assert_eq!(
            super::depthseries::DEPTHSERIES_DOWNLOAD_PATH,
            "/api/v1/depthseries/download"
        );
        assert_eq!(super::ROUTE_PATTERNS.len(), 4);
    }
}
