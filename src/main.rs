//! CLI entry point for the border crossing report tool.
//!
//! Reads a Border Crossing Entry Data CSV and writes the monthly totals per
//! border and measure, with the running average of earlier months.

use anyhow::{Context, Result};
use border_analytics::analyzers::analyzer::analyze;
use border_analytics::analyzers::utility::RoundingMode;
use border_analytics::config::RunConfig;
use border_analytics::output::{print_json, print_pretty};
use clap::{Parser, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "border_analytics")]
#[command(
    about = "Monthly border crossing totals with running averages",
    long_about = None
)]
struct Cli {
    /// Border crossing entry data CSV
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Report CSV to write
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Rounding rule for running averages
    #[arg(long, value_enum, default_value_t = Rounding::HalfUp)]
    rounding: Rounding,

    /// Input field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Print the run summary as JSON once the report is written
    #[arg(long, default_value_t = false)]
    summary: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Rounding {
    /// Exact round-half-up
    HalfUp,
    /// Float bias of +0.2 then round half to even, for comparing with old reports
    Legacy,
}

impl From<Rounding> for RoundingMode {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::HalfUp => RoundingMode::HalfUp,
            Rounding::Legacy => RoundingMode::Legacy,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/border_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("border_analytics.log"));

    // A log directory that cannot be created only costs the file layer
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(log_file_name.to_string_lossy())
        .build(log_dir);
    let (non_blocking_file, _file_guard, log_file_error) = match file_appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = match non_blocking_file {
        Some(writer) => Some(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(writer)
                .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    if let Some(e) = log_file_error {
        warn!(
            log_dir = %log_dir.display(),
            error = %e,
            "Cannot open log file, logging to stderr only"
        );
    }

    let delimiter = u8::try_from(cli.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("delimiter {:?} must be a single ASCII character", cli.delimiter))?;

    let config = RunConfig::new(cli.input, cli.output)
        .with_delimiter(delimiter)
        .with_rounding(cli.rounding.into());

    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        "Building border crossing report"
    );

    let summary = match analyze(&config) {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Report failed");
            return Err(e).context("border crossing report failed");
        }
    };

    print_pretty(&summary);
    if cli.summary {
        print_json(&summary)?;
    }

    Ok(())
}
