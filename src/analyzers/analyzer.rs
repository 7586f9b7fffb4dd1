use crate::analyzers::aggregate::aggregate;
use crate::analyzers::rank::rank;
use crate::config::RunConfig;
use crate::error::Result;
use crate::output::write_report;
use crate::parser::read_records_from_path;
use crate::stats::ReportSummary;
use tracing::info;

/// Reads the input file, builds the ranked monthly report and writes it to
/// the configured output path.
///
/// Nothing is written unless every input row parses; the output file is
/// only touched once the full report is in memory.
#[tracing::instrument(skip_all, fields(input = %config.input.display(), output = %config.output.display()))]
pub fn analyze(config: &RunConfig) -> Result<ReportSummary> {
    let records = read_records_from_path(&config.input, config.delimiter)?;

    let aggregation = aggregate(&records)?;
    let report = rank(&aggregation, config.rounding);

    write_report(&config.output, &report)?;

    let summary = ReportSummary::from_report(records.len(), &report)
        .with_paths(&config.input, &config.output)
        .with_rounding(config.rounding);

    info!(
        records = summary.records_read,
        rows = summary.report_rows,
        series = summary.series,
        months = summary.months,
        "Report complete"
    );

    Ok(summary)
}
