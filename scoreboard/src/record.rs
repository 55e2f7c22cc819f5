use std::fmt;

use chrono::{DateTime, Utc};
use snake_engine::SessionToken;

pub(crate) const ANONYMOUS_NICKNAME: &str = "Anonymous";

/// Stable member identifier from the host site's account system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberId(u64);

impl MemberId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who submitted a run. Guest runs are stored and appear on the public
/// leaderboard, but receive no rank or personal-best feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitter {
    Guest,
    Member { id: MemberId, nickname: String },
}

impl Submitter {
    pub fn member_id(&self) -> Option<MemberId> {
        match self {
            Submitter::Member { id, .. } => Some(*id),
            Submitter::Guest => None,
        }
    }

    pub(crate) fn nickname(&self) -> &str {
        match self {
            Submitter::Member { nickname, .. } => nickname,
            Submitter::Guest => ANONYMOUS_NICKNAME,
        }
    }
}

/// One accepted run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub submitter: Submitter,
    pub session_token: SessionToken,
    pub score: u32,
    pub length: usize,
    pub max_tick_rate_hz: f64,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

/// Feedback returned to the submitting player. Rank and total are member
/// only; guests always get `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub rank: Option<usize>,
    pub total_entries: Option<usize>,
    pub is_personal_best: bool,
}

#[derive(Debug, Clone)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub nickname: String,
    pub score: u32,
    pub length: usize,
    pub speed: String,
    pub duration: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub score: u32,
    pub length: usize,
    pub speed: String,
    pub duration: String,
    pub created_at: DateTime<Utc>,
}
