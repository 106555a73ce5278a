use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{depthseries, timeseries};
use crate::api::{DepthseriesRow, MeasurementId, TimeseriesRecord};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = timeseries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TimeseriesDbRow {
    pub id: Uuid,
    pub datetime: NaiveDateTime,
    pub value: f64,
}

impl From<TimeseriesDbRow> for TimeseriesRecord {
    fn from(row: TimeseriesDbRow) -> Self {
        TimeseriesRecord {
            id: MeasurementId(row.id),
            datetime: row.datetime,
            value: row.value,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = depthseries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DepthseriesDbRow {
    pub id: Uuid,
    pub depth: f64,
    pub value: Option<f64>,
}

impl From<DepthseriesDbRow> for DepthseriesRow {
    fn from(row: DepthseriesDbRow) -> Self {
        DepthseriesRow {
            id: MeasurementId(row.id),
            depth: row.depth,
            value: row.value,
        }
    }
}
