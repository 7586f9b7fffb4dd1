//! Monthly aggregation and report ranking.
//!
//! This module groups parsed crossing records into monthly totals per
//! border and measure, orders them for the report, and attaches the running
//! average of earlier months to each row.

pub mod aggregate;
pub mod analyzer;
pub mod rank;
pub mod types;
pub mod utility;
