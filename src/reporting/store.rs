//! Read-only storage queries the report engine depends on.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{Participant, Submission};

/// Read-only queries the report builder needs from storage.
///
/// Submission windows are half-open: `[from, to)`.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn list_participants_by_channel(&self, channel_id: &str) -> Result<Vec<Participant>>;

    /// Every channel membership held by the user with this display name.
    async fn find_participants_by_name(&self, display_name: &str) -> Result<Vec<Participant>>;

    async fn find_participant_in_channel_name(
        &self,
        display_name: &str,
        channel_name: &str,
    ) -> Result<Option<Participant>>;

    async fn submissions_by_channel_for_period(
        &self,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>>;

    async fn submissions_for_period(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>>;

    async fn submissions_by_channel_name_for_period(
        &self,
        channel_name: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>>;
}
