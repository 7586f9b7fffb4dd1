//! CSV ingestion for border crossing entry data.
//!
//! Only four fixed columns are read: Border, Date, Measure and Value. Port
//! name, port code, state and location are tolerated and ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{AnalyticsError, Result};

const BORDER_COL: usize = 3;
const DATE_COL: usize = 4;
const MEASURE_COL: usize = 5;
const VALUE_COL: usize = 6;
const MIN_FIELDS: usize = VALUE_COL + 1;

/// One data row, reduced to the columns the report needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub border: String,
    /// First day of the month the crossings were counted in.
    pub date: NaiveDate,
    pub measure: String,
    pub value: u64,
}

/// The two timestamp layouts found in published extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `01/01/2019 00:00`
    Clock24,
    /// `01/01/2019 12:00:00 AM`
    Clock12,
}

impl DateFormat {
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Clock24 => "%m/%d/%Y %H:%M",
            DateFormat::Clock12 => "%m/%d/%Y %I:%M:%S %p",
        }
    }

    /// Picks the format for a whole file from one sample value.
    ///
    /// Falls back to [`DateFormat::Clock12`] without validating it; a sample
    /// that matches neither layout fails later when the row is parsed.
    pub fn detect(sample: &str) -> Self {
        if NaiveDateTime::parse_from_str(sample, DateFormat::Clock24.pattern()).is_ok() {
            DateFormat::Clock24
        } else {
            DateFormat::Clock12
        }
    }

    /// Parses `value` and truncates it to the first day of its month.
    pub fn parse_month(self, value: &str) -> Option<NaiveDate> {
        NaiveDateTime::parse_from_str(value, self.pattern())
            .ok()
            .and_then(|dt| dt.date().with_day(1))
    }
}

impl RawRecord {
    /// Builds a record from a CSV row. `line` is only used for error reporting.
    pub fn from_row(row: &StringRecord, line: u64, format: DateFormat) -> Result<Self> {
        if row.len() < MIN_FIELDS {
            return Err(AnalyticsError::MalformedRow {
                line,
                found: row.len(),
            });
        }

        let raw_date = &row[DATE_COL];
        let date = format
            .parse_month(raw_date)
            .ok_or_else(|| AnalyticsError::InvalidDate {
                line,
                value: raw_date.to_string(),
                format: format.pattern(),
            })?;

        let raw_value = &row[VALUE_COL];
        let value = raw_value
            .trim()
            .parse::<u64>()
            .map_err(|_| AnalyticsError::InvalidValue {
                line,
                value: raw_value.to_string(),
            })?;

        Ok(RawRecord {
            border: row[BORDER_COL].to_string(),
            date,
            measure: row[MEASURE_COL].to_string(),
            value,
        })
    }
}

/// Reads every data row from `reader`, skipping the header.
///
/// The date format is detected from the first data row and then applied to
/// the rest of the file.
///
/// # Errors
///
/// Fails on the first row that is short, has a non-integer value, or has a
/// date that does not match the detected format.
pub fn read_records<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut detected_format: Option<DateFormat> = None;
    let mut records = Vec::new();

    for result in rdr.records() {
        let row = result.map_err(|e| AnalyticsError::Csv {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            source: e,
        })?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let format = *detected_format.get_or_insert_with(|| {
            let detected = row
                .get(DATE_COL)
                .map(DateFormat::detect)
                .unwrap_or(DateFormat::Clock12);
            debug!(format = detected.pattern(), "Detected input date format");
            detected
        });

        records.push(RawRecord::from_row(&row, line, format)?);
    }

    Ok(records)
}

/// Opens `path` and reads it with [`read_records`].
#[tracing::instrument(skip(path), fields(input = %path.display()))]
pub fn read_records_from_path(path: &Path, delimiter: u8) -> Result<Vec<RawRecord>> {
    let file = File::open(path).map_err(|source| AnalyticsError::InputAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let records = read_records(file, delimiter)?;
    info!(records = records.len(), "Input records loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Port Name,State,Port Code,Border,Date,Measure,Value,Location\n";

    fn read(body: &str) -> Result<Vec<RawRecord>> {
        read_records(format!("{}{}", HEADER, body).as_bytes(), b',')
    }

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_detect_24_hour_format() {
        assert_eq!(DateFormat::detect("03/01/2019 00:00"), DateFormat::Clock24);
    }

    #[test]
    fn test_detect_falls_back_to_12_hour_format() {
        assert_eq!(
            DateFormat::detect("03/01/2019 12:00:00 AM"),
            DateFormat::Clock12
        );
        assert_eq!(DateFormat::detect("garbage"), DateFormat::Clock12);
    }

    #[test]
    fn test_parse_month_truncates_to_first_of_month() {
        let parsed = DateFormat::Clock12.parse_month("03/17/2019 04:30:00 PM");
        assert_eq!(parsed, Some(month(2019, 3)));
    }

    #[test]
    fn test_reads_12_hour_rows_and_ignores_other_columns() {
        let records = read(
            "Calexico,California,2503,US-Mexico Border,03/01/2019 12:00:00 AM,Pedestrians,346158,\"POINT (-115.49806, 32.67889)\"\n",
        )
        .unwrap();

        assert_eq!(
            records,
            vec![RawRecord {
                border: "US-Mexico Border".to_string(),
                date: month(2019, 3),
                measure: "Pedestrians".to_string(),
                value: 346158,
            }]
        );
    }

    #[test]
    fn test_reads_24_hour_rows() {
        let records = read(
            "Derby Line,Vermont,209,US-Canada Border,02/01/2019 00:00,Trains,19,POINT\n\
             Norton,Vermont,211,US-Canada Border,01/01/2019 00:00,Trains,7,POINT\n",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, month(2019, 2));
        assert_eq!(records[1].date, month(2019, 1));
    }

    #[test]
    fn test_header_only_input_is_empty() {
        assert!(read("").unwrap().is_empty());
    }

    #[test]
    fn test_completely_empty_input_is_empty() {
        assert!(read_records("".as_bytes(), b',').unwrap().is_empty());
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = read("Derby Line,Vermont,209,US-Canada Border,02/01/2019 00:00\n").unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::MalformedRow { line: 2, found: 5 }
        ));
    }

    #[test]
    fn test_non_integer_value_is_rejected() {
        let err = read("A,B,1,US-Canada Border,02/01/2019 00:00,Trains,12.5,P\n").unwrap_err();
        match err {
            AnalyticsError::InvalidValue { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "12.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_value_is_rejected() {
        let err = read("A,B,1,US-Canada Border,02/01/2019 00:00,Trains,-3,P\n").unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidValue { .. }));
    }

    #[test]
    fn test_mixed_date_formats_fail_at_first_mismatch() {
        let err = read(
            "A,B,1,US-Canada Border,02/01/2019 00:00,Trains,1,P\n\
             A,B,1,US-Canada Border,01/01/2019 12:00:00 AM,Trains,1,P\n",
        )
        .unwrap_err();

        match err {
            AnalyticsError::InvalidDate { line, format, .. } => {
                assert_eq!(line, 3);
                assert_eq!(format, DateFormat::Clock24.pattern());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_semicolon_delimiter() {
        let input = "Port;State;Code;Border;Date;Measure;Value\n\
                     A;B;1;US-Canada Border;02/01/2019 00:00;Trains;4\n";
        let records = read_records(input.as_bytes(), b';').unwrap();
        assert_eq!(records[0].value, 4);
        assert_eq!(records[0].border, "US-Canada Border");
    }

    #[test]
    fn test_missing_input_file() {
        let err = read_records_from_path(Path::new("/definitely/not/here.csv"), b',').unwrap_err();
        assert!(matches!(err, AnalyticsError::InputAccess { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_csv_error() {
        let mut input = HEADER.as_bytes().to_vec();
        input.extend_from_slice(b"A,B,1,US-Canada Border,02/01/2019 00:00,Trains,\xff\xfe,P\n");

        let err = read_records(input.as_slice(), b',').unwrap_err();
        assert!(matches!(err, AnalyticsError::Csv { line: 2, .. }));
    }
}
