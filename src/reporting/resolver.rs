//! Per-day attendance: who was expected, who reported, who did not.

use std::fmt;

use serde::Serialize;
use tracing::{error, instrument};

use super::error::ReportError;
use super::period::DayWindow;
use super::store::ReportStore;
use crate::model::{Participant, Submission};

/// What a report is sliced by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// Everyone enrolled in one channel. `name` is only used for display.
    Channel { id: String, name: String },
    /// One user across every channel they are enrolled in.
    User { display_name: String },
    /// One user inside one named channel.
    ChannelAndUser {
        channel_name: String,
        display_name: String,
    },
}

impl Scope {
    pub fn channel(id: impl Into<String>, name: impl Into<String>) -> Self {
        Scope::Channel {
            id: id.into(),
            name: strip_channel_prefix(&name.into()),
        }
    }

    pub fn user(display_name: impl Into<String>) -> Self {
        Scope::User {
            display_name: display_name.into(),
        }
    }

    pub fn channel_and_user(channel_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Scope::ChannelAndUser {
            channel_name: strip_channel_prefix(&channel_name.into()),
            display_name: display_name.into(),
        }
    }

    /// Whether report contents carry one labelled block per channel.
    pub fn is_multi_channel(&self) -> bool {
        matches!(self, Scope::User { .. })
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Channel { id, .. } => write!(f, "channel:{id}"),
            Scope::User { display_name } => write!(f, "user:{display_name}"),
            Scope::ChannelAndUser {
                channel_name,
                display_name,
            } => write!(f, "channel:{channel_name}/user:{display_name}"),
        }
    }
}

fn strip_channel_prefix(name: &str) -> String {
    name.strip_prefix('#').unwrap_or(name).to_string()
}

/// Attendance for one day inside one channel block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAttendance {
    pub day: DayWindow,
    /// Channel label; empty unless the scope spans several channels.
    pub channel: String,
    pub reported: Vec<Submission>,
    pub missing: Vec<Participant>,
}

impl DayAttendance {
    pub fn is_empty(&self) -> bool {
        self.reported.is_empty() && self.missing.is_empty()
    }
}

/// Fetch expected participants and submissions for `scope` on `day` and
/// split the participants into reported and missing.
///
/// Channel-bound scopes yield exactly one block. A user scope yields one
/// block per channel membership, in storage order.
#[instrument(skip_all, fields(scope = %scope, day = %day.start.date_naive()))]
pub async fn resolve(
    store: &dyn ReportStore,
    scope: &Scope,
    day: DayWindow,
) -> Result<Vec<DayAttendance>, ReportError> {
    match scope {
        Scope::Channel { id, .. } => {
            let expected = store
                .list_participants_by_channel(id)
                .await
                .map_err(storage_error("list participants by channel"))?;
            let submissions = store
                .submissions_by_channel_for_period(id, day.start, day.end)
                .await
                .map_err(storage_error("select standups by channel"))?;
            Ok(vec![partition(day, String::new(), &expected, &submissions)])
        }
        Scope::User { display_name } => {
            let memberships = store
                .find_participants_by_name(display_name)
                .await
                .map_err(storage_error("find participants by name"))?;
            let submissions = store
                .submissions_for_period(day.start, day.end)
                .await
                .map_err(storage_error("select standups for period"))?;
            Ok(memberships
                .iter()
                .map(|membership| {
                    partition(
                        day,
                        membership.channel_name.clone(),
                        std::slice::from_ref(membership),
                        &submissions,
                    )
                })
                .collect())
        }
        Scope::ChannelAndUser {
            channel_name,
            display_name,
        } => {
            let expected: Vec<Participant> = store
                .find_participant_in_channel_name(display_name, channel_name)
                .await
                .map_err(storage_error("find participant in channel"))?
                .into_iter()
                .collect();
            let submissions = store
                .submissions_by_channel_name_for_period(channel_name, day.start, day.end)
                .await
                .map_err(storage_error("select standups by channel name"))?;
            Ok(vec![partition(day, String::new(), &expected, &submissions)])
        }
    }
}

fn storage_error(what: &'static str) -> impl Fn(anyhow::Error) -> ReportError {
    move |err| {
        error!(?err, "{}", what);
        ReportError::Storage(err.context(what))
    }
}

/// Participants enrolled after the day ends are left out entirely. Only the
/// first submission matching a participant counts; later duplicates that day
/// are ignored.
fn partition(
    day: DayWindow,
    channel: String,
    expected: &[Participant],
    submissions: &[Submission],
) -> DayAttendance {
    let mut reported = Vec::new();
    let mut missing = Vec::new();
    for participant in expected {
        if participant.enrolled_at > day.end {
            continue;
        }
        match submissions.iter().find(|s| s.is_from(participant)) {
            Some(submission) => reported.push(submission.clone()),
            None => missing.push(participant.clone()),
        }
    }
    DayAttendance {
        day,
        channel,
        reported,
        missing,
    }
}
