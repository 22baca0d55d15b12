use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use super::error::ReportError;
use super::period::normalize;
use super::resolver::{resolve, DayAttendance, Scope};
use super::store::ReportStore;
use crate::model::{Participant, Submission};

/// One channel block of a report day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportContent {
    pub channel: String,
    pub reported: Vec<Submission>,
    pub missing: Vec<Participant>,
}

impl From<DayAttendance> for ReportContent {
    fn from(day: DayAttendance) -> Self {
        Self {
            channel: day.channel,
            reported: day.reported,
            missing: day.missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub contents: Vec<ReportContent>,
}

/// Build one entry per day of `[from, to]` that has anything to report.
///
/// Days where nobody was expected and nobody submitted are dropped. The first
/// storage failure aborts the whole build.
#[instrument(skip_all, fields(scope = %scope))]
pub async fn build_entries(
    store: &dyn ReportStore,
    scope: &Scope,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Vec<ReportEntry>, ReportError> {
    let period = normalize(from, to, now).map_err(|err| {
        error!(%err, "set up dates");
        err
    })?;

    let mut entries = Vec::new();
    for day in period.days() {
        let contents: Vec<ReportContent> = resolve(store, scope, day)
            .await?
            .into_iter()
            .filter(|attendance| !attendance.is_empty())
            .map(ReportContent::from)
            .collect();

        debug!(
            day = %day.start.date_naive(),
            blocks = contents.len(),
            reported = contents.iter().map(|c| c.reported.len()).sum::<usize>(),
            missing = contents.iter().map(|c| c.missing.len()).sum::<usize>(),
            "resolved day"
        );

        if contents.is_empty() {
            continue;
        }
        entries.push(ReportEntry {
            date_from: day.start,
            date_to: day.end,
            contents,
        });
    }

    info!(entries = entries.len(), days = period.day_count + 1, "built report entries");
    Ok(entries)
}
