use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::repo::{self, Pool};
use crate::model::{Participant, Submission};
use crate::reporting::ReportStore;

/// `ReportStore` backed by the SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool,
}

impl SqliteStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for SqliteStore {
    async fn list_participants_by_channel(&self, channel_id: &str) -> Result<Vec<Participant>> {
        repo::list_participants_by_channel(&self.pool, channel_id).await
    }

    async fn find_participants_by_name(&self, display_name: &str) -> Result<Vec<Participant>> {
        repo::find_participants_by_name(&self.pool, display_name).await
    }

    async fn find_participant_in_channel_name(
        &self,
        display_name: &str,
        channel_name: &str,
    ) -> Result<Option<Participant>> {
        repo::find_participant_in_channel_name(&self.pool, display_name, channel_name).await
    }

    async fn submissions_by_channel_for_period(
        &self,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>> {
        repo::select_standups_by_channel_for_period(&self.pool, channel_id, from, to).await
    }

    async fn submissions_for_period(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>> {
        repo::select_standups_for_period(&self.pool, from, to).await
    }

    async fn submissions_by_channel_name_for_period(
        &self,
        channel_name: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>> {
        repo::select_standups_by_channel_name_for_period(&self.pool, channel_name, from, to).await
    }
}
