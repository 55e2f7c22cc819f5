use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use snake_engine::RunReport;

use crate::error::SubmitError;
use crate::format::{format_duration, format_fps};
use crate::record::{
    HistoryEntry, LeaderboardEntry, MemberId, RunRecord, SubmitReceipt, Submitter,
};

pub const SESSION_TOKEN_LEN: usize = 36;
pub const MIN_LENGTH: usize = 3;
pub const MIN_DURATION_MS: u64 = 500;
pub const MAX_QUERY_LIMIT: usize = 100;
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// In-memory score store implementing the accepted submission contract:
/// plausibility checks, session-token deduplication, rank / total /
/// personal-best feedback for members, leaderboard and history queries.
#[derive(Default)]
pub struct ScoreRegistry {
    records: Vec<RunRecord>,
    seen_tokens: HashSet<String>,
}

impl ScoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(
        &mut self,
        report: &RunReport,
        submitter: Submitter,
    ) -> Result<SubmitReceipt, SubmitError> {
        self.submit_at(report, submitter, Utc::now())
    }

    /// Validation order matches the accepted contract: token shape, score
    /// and length plausibility, minimum duration, positive speed, then
    /// duplicate detection. A rejected submission stores nothing and does
    /// not consume its token.
    pub fn submit_at(
        &mut self,
        report: &RunReport,
        submitter: Submitter,
        created_at: DateTime<Utc>,
    ) -> Result<SubmitReceipt, SubmitError> {
        if report.session_token.as_str().len() != SESSION_TOKEN_LEN {
            return Err(SubmitError::InvalidSessionToken);
        }
        if report.score == 0 || report.length < MIN_LENGTH {
            return Err(SubmitError::InvalidScore);
        }
        if report.duration_ms < MIN_DURATION_MS {
            return Err(SubmitError::DurationTooShort);
        }
        if report.max_tick_rate_hz <= 0.0 {
            return Err(SubmitError::InvalidSpeed);
        }
        if !self
            .seen_tokens
            .insert(report.session_token.as_str().to_string())
        {
            return Err(SubmitError::DuplicateSubmission);
        }

        self.records.push(RunRecord {
            submitter,
            session_token: report.session_token.clone(),
            score: report.score,
            length: report.length,
            max_tick_rate_hz: report.max_tick_rate_hz,
            duration_ms: report.duration_ms,
            created_at,
        });
        let record = self.records.last().expect("record was just stored");

        let receipt = match record.submitter.member_id() {
            Some(member) => SubmitReceipt {
                rank: Some(self.member_rank_of(record)),
                total_entries: Some(self.member_entry_count()),
                is_personal_best: self.is_personal_best(member, record),
            },
            None => SubmitReceipt {
                rank: None,
                total_entries: None,
                is_personal_best: false,
            },
        };
        Ok(receipt)
    }

    pub fn leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardEntry> {
        let limit = clamp_limit(limit, DEFAULT_LEADERBOARD_LIMIT);
        let mut ordered: Vec<&RunRecord> = self.records.iter().collect();
        ordered.sort_by(|a, b| compare_best_first(a, b));
        ordered
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, record)| LeaderboardEntry {
                rank: idx + 1,
                nickname: record.submitter.nickname().to_string(),
                score: record.score,
                length: record.length,
                speed: format_fps(record.max_tick_rate_hz),
                duration: format_duration(record.duration_ms),
                created_at: record.created_at,
            })
            .collect()
    }

    pub fn history(&self, member: MemberId, limit: Option<usize>) -> Vec<HistoryEntry> {
        let limit = clamp_limit(limit, DEFAULT_HISTORY_LIMIT);
        let mut entries: Vec<&RunRecord> = self
            .records
            .iter()
            .filter(|r| r.submitter.member_id() == Some(member))
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
            .into_iter()
            .take(limit)
            .map(|record| HistoryEntry {
                score: record.score,
                length: record.length,
                speed: format_fps(record.max_tick_rate_hz),
                duration: format_duration(record.duration_ms),
                created_at: record.created_at,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn member_rank_of(&self, record: &RunRecord) -> usize {
        self.records
            .iter()
            .filter(|r| r.submitter.member_id().is_some())
            .filter(|r| beats(r, record))
            .count()
            + 1
    }

    fn member_entry_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.submitter.member_id().is_some())
            .count()
    }

    /// A personal best has no strictly better earlier run by the same
    /// member; an equal run still counts as a best.
    fn is_personal_best(&self, member: MemberId, record: &RunRecord) -> bool {
        !self
            .records
            .iter()
            .filter(|r| r.submitter.member_id() == Some(member))
            .any(|r| beats(r, record))
    }
}

/// Strictly better: higher score, then greater length, then shorter
/// duration.
fn beats(a: &RunRecord, b: &RunRecord) -> bool {
    a.score > b.score
        || (a.score == b.score && a.length > b.length)
        || (a.score == b.score && a.length == b.length && a.duration_ms < b.duration_ms)
}

fn compare_best_first(a: &RunRecord, b: &RunRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then(b.length.cmp(&a.length))
        .then(a.duration_ms.cmp(&b.duration_ms))
}

fn clamp_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_QUERY_LIMIT)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use snake_engine::SessionToken;

    use super::*;

    fn token(n: u32) -> SessionToken {
        SessionToken::new(format!("{:036}", n))
    }

    fn report(n: u32, score: u32, length: usize, duration_ms: u64) -> RunReport {
        RunReport {
            session_token: token(n),
            score,
            length,
            duration_ms,
            max_tick_rate_hz: 7.2,
        }
    }

    fn member(id: u64, nickname: &str) -> Submitter {
        Submitter::Member {
            id: MemberId::new(id),
            nickname: nickname.to_string(),
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_rejects_malformed_token() {
        let mut registry = ScoreRegistry::new();
        let mut bad = report(1, 50, 8, 10_000);
        bad.session_token = SessionToken::new("short".to_string());
        assert_eq!(
            registry.submit(&bad, Submitter::Guest),
            Err(SubmitError::InvalidSessionToken)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rejects_implausible_score_or_length() {
        let mut registry = ScoreRegistry::new();
        assert_eq!(
            registry.submit(&report(1, 0, 8, 10_000), Submitter::Guest),
            Err(SubmitError::InvalidScore)
        );
        assert_eq!(
            registry.submit(&report(2, 50, 2, 10_000), Submitter::Guest),
            Err(SubmitError::InvalidScore)
        );
    }

    #[test]
    fn test_rejects_short_duration() {
        let mut registry = ScoreRegistry::new();
        assert_eq!(
            registry.submit(&report(1, 50, 8, 499), Submitter::Guest),
            Err(SubmitError::DurationTooShort)
        );
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let mut registry = ScoreRegistry::new();
        let mut bad = report(1, 50, 8, 10_000);
        bad.max_tick_rate_hz = 0.0;
        assert_eq!(
            registry.submit(&bad, Submitter::Guest),
            Err(SubmitError::InvalidSpeed)
        );
    }

    #[test]
    fn test_rejects_duplicate_session_token() {
        let mut registry = ScoreRegistry::new();
        assert!(registry.submit(&report(1, 50, 8, 10_000), Submitter::Guest).is_ok());
        assert_eq!(
            registry.submit(&report(1, 70, 10, 12_000), Submitter::Guest),
            Err(SubmitError::DuplicateSubmission)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_rejected_submission_does_not_consume_token() {
        let mut registry = ScoreRegistry::new();
        assert_eq!(
            registry.submit(&report(1, 50, 8, 100), Submitter::Guest),
            Err(SubmitError::DurationTooShort)
        );
        assert!(registry.submit(&report(1, 50, 8, 10_000), Submitter::Guest).is_ok());
    }

    #[test]
    fn test_guest_receipt_has_no_rank_feedback() {
        let mut registry = ScoreRegistry::new();
        let receipt = registry
            .submit(&report(1, 50, 8, 10_000), Submitter::Guest)
            .unwrap();
        assert_eq!(
            receipt,
            SubmitReceipt {
                rank: None,
                total_entries: None,
                is_personal_best: false,
            }
        );
    }

    #[test]
    fn test_member_rank_and_total() {
        let mut registry = ScoreRegistry::new();
        registry
            .submit(&report(1, 100, 13, 30_000), member(1, "alice"))
            .unwrap();
        registry
            .submit(&report(2, 50, 8, 20_000), member(2, "bob"))
            .unwrap();

        let receipt = registry
            .submit(&report(3, 75, 10, 25_000), member(3, "carol"))
            .unwrap();
        assert_eq!(receipt.rank, Some(2));
        assert_eq!(receipt.total_entries, Some(3));
        assert!(receipt.is_personal_best);
    }

    #[test]
    fn test_rank_tiebreakers_length_then_duration() {
        let mut registry = ScoreRegistry::new();
        registry
            .submit(&report(1, 50, 9, 20_000), member(1, "alice"))
            .unwrap();
        // Same score, shorter snake: behind alice.
        let receipt = registry
            .submit(&report(2, 50, 8, 10_000), member(2, "bob"))
            .unwrap();
        assert_eq!(receipt.rank, Some(2));

        // Same score and length as bob, faster run: ahead of bob.
        let receipt = registry
            .submit(&report(3, 50, 8, 5_000), member(3, "carol"))
            .unwrap();
        assert_eq!(receipt.rank, Some(2));
    }

    #[test]
    fn test_guests_excluded_from_member_rank() {
        let mut registry = ScoreRegistry::new();
        registry
            .submit(&report(1, 200, 23, 60_000), Submitter::Guest)
            .unwrap();

        let receipt = registry
            .submit(&report(2, 100, 13, 30_000), member(1, "alice"))
            .unwrap();
        assert_eq!(receipt.rank, Some(1));
        assert_eq!(receipt.total_entries, Some(1));

        // The guest still tops the public leaderboard.
        let board = registry.leaderboard(None);
        assert_eq!(board[0].nickname, "Anonymous");
        assert_eq!(board[1].nickname, "alice");
    }

    #[test]
    fn test_personal_best_tracking() {
        let mut registry = ScoreRegistry::new();
        let first = registry
            .submit(&report(1, 50, 8, 20_000), member(1, "alice"))
            .unwrap();
        assert!(first.is_personal_best);

        let worse = registry
            .submit(&report(2, 40, 7, 20_000), member(1, "alice"))
            .unwrap();
        assert!(!worse.is_personal_best);

        let better = registry
            .submit(&report(3, 60, 9, 20_000), member(1, "alice"))
            .unwrap();
        assert!(better.is_personal_best);
    }

    #[test]
    fn test_leaderboard_order_formatting_and_limit() {
        let mut registry = ScoreRegistry::new();
        registry
            .submit(&report(1, 30, 6, 83_450), member(1, "alice"))
            .unwrap();
        registry
            .submit(&report(2, 90, 12, 40_000), member(2, "bob"))
            .unwrap();
        registry
            .submit(&report(3, 60, 9, 30_000), Submitter::Guest)
            .unwrap();

        let board = registry.leaderboard(Some(2));
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].nickname, "bob");
        assert_eq!(board[1].nickname, "Anonymous");

        let full = registry.leaderboard(None);
        assert_eq!(full[2].nickname, "alice");
        assert_eq!(full[2].duration, "1:23.45");
        assert_eq!(full[2].speed, "7.2");
    }

    #[test]
    fn test_query_limits_are_clamped() {
        let mut registry = ScoreRegistry::new();
        for n in 0..3 {
            registry
                .submit(&report(n, 10 + n, 5, 10_000), Submitter::Guest)
                .unwrap();
        }
        assert_eq!(registry.leaderboard(Some(0)).len(), 1);
        assert_eq!(registry.leaderboard(Some(1000)).len(), 3);
    }

    #[test]
    fn test_history_is_member_scoped_and_newest_first() {
        let mut registry = ScoreRegistry::new();
        registry
            .submit_at(&report(1, 30, 6, 10_000), member(1, "alice"), at(100))
            .unwrap();
        registry
            .submit_at(&report(2, 90, 12, 10_000), member(2, "bob"), at(200))
            .unwrap();
        registry
            .submit_at(&report(3, 50, 8, 10_000), member(1, "alice"), at(300))
            .unwrap();

        let history = registry.history(MemberId::new(1), None);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].score, 50);
        assert_eq!(history[1].score, 30);
    }
}
