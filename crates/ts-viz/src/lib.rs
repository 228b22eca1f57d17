//! # ts-viz
//!
//! Report artifacts for tariffstat.
//!
//! This crate is intentionally dependency-light and focuses on emitting
//! plot-friendly structures (flat arrays of points, one series per industry)
//! and the grouped descriptive table. Drawing lives in `ts-viz-render`.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::time::{SystemTime, UNIX_EPOCH};

/// Grouped descriptive statistics by industry and policy era.
pub mod summary;

/// Employment trend series per industry with policy-date markers.
pub mod trends;

pub use summary::{EmploymentStats, MeanStd, SummaryRow, SummaryTable, summary_statistics};
pub use trends::{
    PolicyMarker, TrendPoint, TrendSeries, TrendsArtifact, TrendsMeta, employment_trends_artifact,
};

pub(crate) fn now_unix_ms() -> ts_core::Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ts_core::Error::Validation(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}
