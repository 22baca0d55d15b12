//! Failures of a report build.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("starting date {from} is later than end date {to}")]
    InvalidRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    #[error("report end {to} is in the future (now is {now})")]
    FutureRange { to: DateTime<Utc>, now: DateTime<Utc> },
    #[error("storage query failed: {0:#}")]
    Storage(anyhow::Error),
}
