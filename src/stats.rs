use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::analyzers::types::ReportRow;
use crate::analyzers::utility::RoundingMode;

#[derive(Debug, Default, Serialize)]
pub struct ReportSummary {
    pub input: Option<String>,
    pub output: Option<String>,
    pub rounding: RoundingMode,

    pub records_read: usize,
    pub report_rows: usize,
    pub series: usize,
    pub months: usize,
    pub earliest_month: Option<NaiveDate>,
    pub latest_month: Option<NaiveDate>,
    pub total_crossings: u128,
}

impl ReportSummary {
    pub fn from_report(records_read: usize, rows: &[ReportRow]) -> Self {
        let mut series = HashSet::new();
        let mut months = BTreeSet::new();
        let mut total_crossings = 0u128;

        for row in rows {
            series.insert((row.border.as_str(), row.measure.as_str()));
            months.insert(row.date);
            total_crossings += u128::from(row.value);
        }

        ReportSummary {
            records_read,
            report_rows: rows.len(),
            series: series.len(),
            months: months.len(),
            earliest_month: months.first().copied(),
            latest_month: months.last().copied(),
            total_crossings,
            ..Default::default()
        }
    }

    /// Set the input and output file locations
    pub fn with_paths(mut self, input: &Path, output: &Path) -> Self {
        self.input = Some(input.display().to_string());
        self.output = Some(output.display().to_string());
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(border: &str, m: u32, measure: &str, value: u64) -> ReportRow {
        ReportRow {
            border: border.to_string(),
            date: NaiveDate::from_ymd_opt(2019, m, 1).unwrap(),
            measure: measure.to_string(),
            value,
            average: 0,
        }
    }

    #[test]
    fn test_from_empty_report() {
        let summary = ReportSummary::from_report(0, &[]);

        assert_eq!(summary.report_rows, 0);
        assert_eq!(summary.series, 0);
        assert_eq!(summary.months, 0);
        assert_eq!(summary.earliest_month, None);
        assert_eq!(summary.latest_month, None);
        assert_eq!(summary.total_crossings, 0);
    }

    #[test]
    fn test_from_report_counts() {
        let rows = vec![
            row("US-Mexico Border", 3, "Pedestrians", 346158),
            row("US-Canada Border", 3, "Trains", 19),
            row("US-Mexico Border", 2, "Pedestrians", 172163),
            row("US-Mexico Border", 1, "Pedestrians", 56810),
        ];

        let summary = ReportSummary::from_report(7, &rows);

        assert_eq!(summary.records_read, 7);
        assert_eq!(summary.report_rows, 4);
        assert_eq!(summary.series, 2);
        assert_eq!(summary.months, 3);
        assert_eq!(summary.earliest_month, NaiveDate::from_ymd_opt(2019, 1, 1));
        assert_eq!(summary.latest_month, NaiveDate::from_ymd_opt(2019, 3, 1));
        assert_eq!(summary.total_crossings, 346158 + 19 + 172163 + 56810);
    }

    #[test]
    fn test_with_paths() {
        let summary = ReportSummary::default()
            .with_paths(Path::new("input/in.csv"), Path::new("output/report.csv"));

        assert_eq!(summary.input.as_deref(), Some("input/in.csv"));
        assert_eq!(summary.output.as_deref(), Some("output/report.csv"));
    }
}
