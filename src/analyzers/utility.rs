use serde::Serialize;

/// How a running average is rounded to a whole number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Exact integer round-half-up.
    #[default]
    HalfUp,
    /// `sum / months + 0.2` in floating point, then round half to even.
    /// Reproduces reports generated by older tooling, including its
    /// occasional misrounding of values just above `.3`.
    Legacy,
}

/// Mean of `sum` over `months`, rounded per `mode`. Returns 0 when there are
/// no months.
///
/// `sum` is the total of `months` values that each fit in a `u64`, so the
/// result always fits too.
pub fn rounded_mean(sum: u128, months: u64, mode: RoundingMode) -> u64 {
    if months == 0 {
        return 0;
    }

    match mode {
        RoundingMode::HalfUp => {
            let months = u128::from(months);
            ((2 * sum + months) / (2 * months)) as u64
        }
        RoundingMode::Legacy => (sum as f64 / months as f64 + 0.2).round_ties_even() as u64,
    }
}
