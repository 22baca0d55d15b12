//! Standup attendance reports.
//!
//! - `period`: validates a `(from, to)` request and splits it into UTC days.
//! - `resolver`: per-day expected participants vs. actual submissions.
//! - `builder`: walks the days and keeps the ones with something to report.
//! - `render`: turns entries into localized text.
//!
//! Storage is reached only through the read-only `ReportStore` trait.

pub mod builder;
pub mod error;
pub mod period;
pub mod render;
pub mod resolver;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{build_entries, ReportContent, ReportEntry};
pub use error::ReportError;
pub use period::{midnight, normalize, start_of_day, DayWindow, ReportPeriod};
pub use render::{render_entries, render_header};
pub use resolver::{resolve, DayAttendance, Scope};
pub use store::ReportStore;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument};

use crate::i18n::Localizer;

/// Build and render a full report: scope header followed by one block per
/// active day, or the "no data" message.
#[instrument(skip_all, fields(scope = %scope, %from, %to))]
pub async fn standup_report(
    store: &dyn ReportStore,
    localizer: &Localizer,
    scope: &Scope,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<String, ReportError> {
    let entries = build_entries(store, scope, from, to, now)
        .await
        .map_err(|err| {
            error!(%err, "get report entries");
            err
        })?;
    info!(entries = entries.len(), "report entries ready");

    let mut report = render_header(localizer, scope);
    report += &render_entries(localizer, scope, &entries);
    Ok(report)
}

/// Text shown to the requester when a report could not be produced.
pub fn error_message(localizer: &Localizer, err: &ReportError) -> String {
    localizer.lookup("report_error", &[("cause", err.to_string().as_str())])
}
