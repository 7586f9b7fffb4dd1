use crate::analyzers::types::{Aggregation, MonthlyTotal, Series, SeriesKey};
use crate::error::{AnalyticsError, Result};
use crate::parser::RawRecord;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Groups records by (border, measure, month) and sums their values.
///
/// Port is ignored, so every port on a border contributes to the same total.
/// Totals keep the order in which their triple first appeared. The per-series
/// history is built from the merged totals, so a month occurs once per series
/// no matter how many records fed it.
///
/// # Errors
///
/// Returns [`AnalyticsError::ValueOverflow`] if a monthly total does not fit
/// in a `u64`.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn aggregate(records: &[RawRecord]) -> Result<Aggregation> {
    let mut totals: Vec<MonthlyTotal> = Vec::new();
    let mut index: HashMap<(SeriesKey, NaiveDate), usize> = HashMap::new();

    for record in records {
        let key = SeriesKey::new(record.border.as_str(), record.measure.as_str());

        match index.get(&(key.clone(), record.date)).copied() {
            Some(i) => {
                let total = &mut totals[i];
                total.value = total.value.checked_add(record.value).ok_or_else(|| {
                    AnalyticsError::ValueOverflow {
                        border: record.border.clone(),
                        measure: record.measure.clone(),
                        month: record.date,
                    }
                })?;
            }
            None => {
                index.insert((key.clone(), record.date), totals.len());
                totals.push(MonthlyTotal {
                    key,
                    month: record.date,
                    value: record.value,
                });
            }
        }
    }

    let mut series: HashMap<SeriesKey, Series> = HashMap::new();
    for total in &totals {
        series
            .entry(total.key.clone())
            .or_default()
            .insert(total.month, total.value);
    }

    debug!(
        monthly_totals = totals.len(),
        series = series.len(),
        "Aggregation complete"
    );

    Ok(Aggregation { totals, series })
}
