mod observer;
mod session;

pub use observer::GameObserver;
pub use session::SnakeSession;
