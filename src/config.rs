use crate::analyzers::utility::RoundingMode;
use std::path::PathBuf;

/// Settings for a single report run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Input field delimiter. Output is always comma separated.
    pub delimiter: u8,
    pub rounding: RoundingMode,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        RunConfig {
            input: input.into(),
            output: output.into(),
            delimiter: b',',
            rounding: RoundingMode::default(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }
}
