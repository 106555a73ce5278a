//! Public API surface for the measurements backend.
//!
//! Row types stored by the repositories and the serialized shapes returned by
//! the HTTP layer. All types derive Serialize/Deserialize for JSON output.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::routes::depthseries::DepthseriesFilter;
pub use crate::routes::timeseries::TimeseriesFilter;

/// Measurement identifier (database primary key).
///
/// Serialized as the hyphenated UUID string.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MeasurementId(pub Uuid);

impl MeasurementId {
    pub fn new(value: Uuid) -> Self {
        MeasurementId(value)
    }

    /// Fresh random identifier.
    pub fn generate() -> Self {
        MeasurementId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MeasurementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single time series measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesRecord {
    pub id: MeasurementId,
    pub datetime: NaiveDateTime,
    pub value: f64,
}

/// A stored depth series row. `value` may be missing in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthseriesRow {
    pub id: MeasurementId,
    pub depth: f64,
    pub value: Option<f64>,
}

impl DepthseriesRow {
    /// Convert into the served shape, dropping rows without a value.
    pub fn into_record(self) -> Option<DepthseriesRecord> {
        self.value.map(|value| DepthseriesRecord {
            id: self.id,
            depth: self.depth,
            value,
        })
    }
}

/// A served depth series measurement (value always present).
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthseriesRecord {
    pub id: MeasurementId,
    pub depth: f64,
    pub value: f64,
}

/// Time series row to insert; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeseries {
    pub datetime: NaiveDateTime,
    pub value: f64,
}

/// Depth series row to insert; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDepthseries {
    pub depth: f64,
    pub value: Option<f64>,
}
