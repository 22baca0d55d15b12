//! Turns a raw `(from, to)` request into whole UTC days.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use super::error::ReportError;

/// Start of the first reported day plus how many further days follow it.
/// `day_count == 0` is a single-day report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start: DateTime<Utc>,
    pub day_count: i64,
}

/// Bounds of one day inside a period: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportPeriod {
    /// Every day of the period, both ends included.
    pub fn days(&self) -> impl Iterator<Item = DayWindow> + '_ {
        (0..=self.day_count).map(move |day| {
            let start = self.start + Duration::days(day);
            DayWindow {
                start,
                end: start + Duration::days(1),
            }
        })
    }
}

/// Validate the range against `now` and align it to UTC midnight.
pub fn normalize(
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<ReportPeriod, ReportError> {
    if to < from {
        return Err(ReportError::InvalidRange { from, to });
    }
    if to > now {
        return Err(ReportError::FutureRange { to, now });
    }
    let start = midnight(from);
    let day_count = (midnight(to) - start).num_days();
    Ok(ReportPeriod { start, day_count })
}

/// Start of the UTC day containing `at`.
pub fn midnight(at: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(at.date_naive())
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
