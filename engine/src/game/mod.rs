mod settings;
mod snake;
mod snapshot;
mod state;
mod types;

pub use settings::EngineSettings;
pub use snake::SnakeBody;
pub use snapshot::{GameSnapshot, RunReport};
pub use state::{GameState, TickOutcome};
pub use types::{Direction, EndReason, Phase, Point};
