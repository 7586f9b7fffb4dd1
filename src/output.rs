//! Report rendering and persistence.
//!
//! The report is written to a temporary file beside the destination and
//! renamed into place, so a failed run never leaves a truncated report.

use chrono::NaiveDateTime;
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::analyzers::types::ReportRow;
use crate::error::{AnalyticsError, Result};
use crate::stats::ReportSummary;

pub const REPORT_HEADER: [&str; 5] = ["Border", "Date", "Measure", "Value", "Average"];
pub const REPORT_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

#[derive(Serialize)]
struct CsvRow<'a> {
    border: &'a str,
    date: String,
    measure: &'a str,
    value: u64,
    average: u64,
}

impl<'a> From<&'a ReportRow> for CsvRow<'a> {
    fn from(row: &'a ReportRow) -> Self {
        CsvRow {
            border: &row.border,
            date: NaiveDateTime::from(row.date)
                .format(REPORT_DATE_FORMAT)
                .to_string(),
            measure: &row.measure,
            value: row.value,
            average: row.average,
        }
    }
}

/// Logs the run summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &ReportSummary) {
    debug!("{:#?}", summary);
}

/// Prints the run summary to stdout as pretty JSON.
pub fn print_json(summary: &ReportSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn output_error(path: &Path, source: io::Error) -> AnalyticsError {
    AnalyticsError::OutputAccess {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes the report as CSV to `path`, replacing any existing file.
///
/// The header is always written, even for an empty report.
#[tracing::instrument(skip_all, fields(output = %path.display(), rows = rows.len()))]
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir).map_err(|e| output_error(path, e))?;
    debug!(tmp = %tmp.path().display(), "Writing report to temporary file");

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(tmp);

    writer
        .write_record(REPORT_HEADER)
        .map_err(|e| output_error(path, e.into()))?;
    for row in rows {
        writer
            .serialize(CsvRow::from(row))
            .map_err(|e| output_error(path, e.into()))?;
    }

    let tmp = writer
        .into_inner()
        .map_err(|e| output_error(path, e.into_error()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| output_error(path, e))?;
    tmp.persist(path).map_err(|e| output_error(path, e.error))?;

    info!("Report written");
    Ok(())
}
