//! CSV rendering for depth series downloads.

use crate::api::DepthseriesRecord;

/// Attachment filename offered to the client.
pub const CSV_FILENAME: &str = "depthseries_data.csv";

/// Content type of the download.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Fixed column order; written even when there are no rows.
pub const CSV_HEADER: [&str; 3] = ["id", "depth", "value"];

/// Render depth series rows as a CSV document with a header line.
pub fn depthseries_to_csv(rows: &[DepthseriesRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// `Content-Disposition` value for the download.
pub fn content_disposition() -> String {
    format!("attachment; filename=\"{}\"", CSV_FILENAME)
}
