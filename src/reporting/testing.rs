//! In-memory `ReportStore` used by the reporting unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::store::ReportStore;
use crate::model::{Participant, Submission};

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn participant(
    id: &str,
    name: &str,
    channel_id: &str,
    channel_name: &str,
    enrolled_at: DateTime<Utc>,
) -> Participant {
    Participant {
        participant_id: id.into(),
        display_name: name.into(),
        channel_id: channel_id.into(),
        channel_name: channel_name.into(),
        enrolled_at,
    }
}

pub fn submission(
    author_id: &str,
    author_name: &str,
    channel_id: &str,
    channel_name: &str,
    comment: &str,
    submitted_at: DateTime<Utc>,
) -> Submission {
    Submission {
        author_id: author_id.into(),
        author_name: author_name.into(),
        channel_id: channel_id.into(),
        channel_name: channel_name.into(),
        comment: comment.into(),
        submitted_at,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    participants: Vec<Participant>,
    submissions: Vec<Submission>,
    fail_after: Option<usize>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_participant(mut self, p: Participant) -> Self {
        self.participants.push(p);
        self
    }

    pub fn with_submission(mut self, s: Submission) -> Self {
        self.submissions.push(s);
        self
    }

    /// Every query fails.
    pub fn failing(self) -> Self {
        self.fail_after(0)
    }

    /// The first `n` queries succeed, the rest fail.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) -> Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_after {
            Some(n) if call >= n => Err(anyhow!("store unavailable")),
            _ => Ok(()),
        }
    }

    fn window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        keep: impl Fn(&Submission) -> bool,
    ) -> Vec<Submission> {
        self.submissions
            .iter()
            .filter(|s| s.submitted_at >= from && s.submitted_at < to && keep(s))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn list_participants_by_channel(&self, channel_id: &str) -> Result<Vec<Participant>> {
        self.tick()?;
        Ok(self
            .participants
            .iter()
            .filter(|p| p.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn find_participants_by_name(&self, display_name: &str) -> Result<Vec<Participant>> {
        self.tick()?;
        Ok(self
            .participants
            .iter()
            .filter(|p| p.display_name == display_name)
            .cloned()
            .collect())
    }

    async fn find_participant_in_channel_name(
        &self,
        display_name: &str,
        channel_name: &str,
    ) -> Result<Option<Participant>> {
        self.tick()?;
        Ok(self
            .participants
            .iter()
            .find(|p| p.display_name == display_name && p.channel_name == channel_name)
            .cloned())
    }

    async fn submissions_by_channel_for_period(
        &self,
        channel_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>> {
        self.tick()?;
        Ok(self.window(from, to, |s| s.channel_id == channel_id))
    }

    async fn submissions_for_period(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>> {
        self.tick()?;
        Ok(self.window(from, to, |_| true))
    }

    async fn submissions_by_channel_name_for_period(
        &self,
        channel_name: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Submission>> {
        self.tick()?;
        Ok(self.window(from, to, |s| s.channel_name == channel_name))
    }
}
