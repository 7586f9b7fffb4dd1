//! Error types for the ingestion, aggregation and report pipeline.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Every fatal condition a run can hit. None of them are retried.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("cannot read input {path:?}: {source}")]
    InputAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error on line {line}: {source}")]
    Csv { line: u64, source: csv::Error },

    #[error("malformed row on line {line}: expected at least 7 fields, found {found}")]
    MalformedRow { line: u64, found: usize },

    #[error("invalid value {value:?} on line {line}: expected a non-negative integer")]
    InvalidValue { line: u64, value: String },

    #[error("invalid date {value:?} on line {line}: does not match {format:?}")]
    InvalidDate {
        line: u64,
        value: String,
        format: &'static str,
    },

    #[error("monthly total for {border:?} / {measure:?} in {month} is too large to represent")]
    ValueOverflow {
        border: String,
        measure: String,
        month: NaiveDate,
    },

    #[error("cannot write output {path:?}: {source}")]
    OutputAccess {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
