//! Data types used by the aggregation and ranking pipeline.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Identifies one time series of monthly totals. Matching is exact; no case
/// folding or trimming is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesKey {
    pub border: String,
    pub measure: String,
}

impl SeriesKey {
    pub fn new(border: impl Into<String>, measure: impl Into<String>) -> Self {
        SeriesKey {
            border: border.into(),
            measure: measure.into(),
        }
    }
}

/// Sum of all records sharing a border, measure and month, across every port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTotal {
    pub key: SeriesKey,
    pub month: NaiveDate,
    pub value: u64,
}

/// Monthly totals of one series, one point per month, ordered by month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    points: BTreeMap<NaiveDate, u64>,
}

impl Series {
    pub(crate) fn insert(&mut self, month: NaiveDate, total: u64) {
        self.points.insert(month, total);
    }

    /// Sum of the totals strictly before `month`, and how many months they span.
    /// The sum is widened so many large months cannot overflow it.
    pub fn prior(&self, month: NaiveDate) -> (u128, u64) {
        self.points
            .range(..month)
            .fold((0, 0), |(sum, months), (_, &total)| {
                (sum + u128::from(total), months + 1)
            })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.points.iter().map(|(m, v)| (*m, *v))
    }
}

/// Output of the aggregation pass. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Monthly totals in the order their triple was first seen.
    pub totals: Vec<MonthlyTotal>,
    pub series: HashMap<SeriesKey, Series>,
}

/// One line of the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub border: String,
    pub date: NaiveDate,
    pub measure: String,
    pub value: u64,
    pub average: u64,
}

impl ReportRow {
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey::new(self.border.as_str(), self.measure.as_str())
    }
}

impl From<&MonthlyTotal> for ReportRow {
    fn from(total: &MonthlyTotal) -> Self {
        ReportRow {
            border: total.key.border.clone(),
            date: total.month,
            measure: total.key.measure.clone(),
            value: total.value,
            average: 0,
        }
    }
}
