use thiserror::Error;

/// Rejection codes for run submissions. The thresholds behind them are
/// policy of this collaborator, not of the simulation engine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("session token is malformed")]
    InvalidSessionToken,
    #[error("score or length is not plausible for a finished run")]
    InvalidScore,
    #[error("run duration is too short")]
    DurationTooShort,
    #[error("maximum speed must be positive")]
    InvalidSpeed,
    #[error("this session was already submitted")]
    DuplicateSubmission,
}
