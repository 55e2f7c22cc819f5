pub mod game;
pub mod identifiers;
pub mod logger;
pub mod session;
pub mod session_rng;

pub use game::{
    Direction, EndReason, EngineSettings, GameSnapshot, GameState, Phase, Point, RunReport,
    SnakeBody, TickOutcome,
};
pub use identifiers::SessionToken;
pub use session::{GameObserver, SnakeSession};
pub use session_rng::SessionRng;
