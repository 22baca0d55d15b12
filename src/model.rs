use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person expected to submit standups in one channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub participant_id: String,
    pub display_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub enrolled_at: DateTime<Utc>,
}

/// One standup submission as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub author_id: String,
    pub author_name: String,
    pub channel_id: String,
    pub channel_name: String,
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// True when this submission was written by `participant` in the
    /// participant's own channel.
    pub fn is_from(&self, participant: &Participant) -> bool {
        self.author_id == participant.participant_id && self.channel_id == participant.channel_id
    }
}
