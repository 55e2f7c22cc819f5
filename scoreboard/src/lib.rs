pub mod error;
pub mod format;
pub mod record;
pub mod registry;

pub use error::SubmitError;
pub use record::{HistoryEntry, LeaderboardEntry, MemberId, RunRecord, SubmitReceipt, Submitter};
pub use registry::ScoreRegistry;
