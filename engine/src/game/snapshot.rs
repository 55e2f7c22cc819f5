use serde::{Deserialize, Serialize};

use super::types::{Direction, EndReason, Phase, Point};
use crate::identifiers::SessionToken;

/// Immutable view of a run, emitted to observers after every state change.
/// Segments are head-first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub session_token: SessionToken,
    pub phase: Phase,
    pub tick: u64,
    pub snake: Vec<Point>,
    pub direction: Direction,
    pub food: Option<Point>,
    pub score: u32,
    pub length: usize,
    pub tick_interval_ms: u64,
    pub max_tick_rate_hz: f64,
    pub duration_ms: u64,
    pub end_reason: Option<EndReason>,
}

/// Terminal record of a finished run, forwarded to the scoring collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub session_token: SessionToken,
    pub score: u32,
    pub length: usize,
    pub duration_ms: u64,
    pub max_tick_rate_hz: f64,
}

impl RunReport {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        Self {
            session_token: snapshot.session_token.clone(),
            score: snapshot.score,
            length: snapshot.length,
            duration_ms: snapshot.duration_ms,
            max_tick_rate_hz: snapshot.max_tick_rate_hz,
        }
    }
}
