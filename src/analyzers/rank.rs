//! Report ordering and running averages.

use crate::analyzers::types::{Aggregation, ReportRow};
use crate::analyzers::utility::{RoundingMode, rounded_mean};
use std::cmp::Ordering;

/// Report order: date, value, measure, then border, all descending.
pub fn report_order(a: &ReportRow, b: &ReportRow) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.value.cmp(&a.value))
        .then_with(|| b.measure.cmp(&a.measure))
        .then_with(|| b.border.cmp(&a.border))
}

/// Sorts the aggregated totals into report order and fills in each row's
/// running average.
///
/// A row's average only looks at months strictly before its own within the
/// same (border, measure) series, and divides by the number of those months.
#[tracing::instrument(skip_all, fields(totals = aggregation.totals.len(), rounding = ?rounding))]
pub fn rank(aggregation: &Aggregation, rounding: RoundingMode) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = aggregation.totals.iter().map(ReportRow::from).collect();
    rows.sort_by(report_order);

    for row in &mut rows {
        let (sum, months) = aggregation
            .series
            .get(&row.series_key())
            .map(|series| series.prior(row.date))
            .unwrap_or((0, 0));
        row.average = rounded_mean(sum, months, rounding);
    }

    rows
}
