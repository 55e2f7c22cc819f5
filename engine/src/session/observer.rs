use std::future::Future;

use crate::game::{GameSnapshot, RunReport};

/// Callbacks through which a presentation or reporting collaborator watches
/// a session. `state_changed` fires after every successful command and tick;
/// `run_finished` fires once, additionally, when a run ends in a collision.
/// An observer that fails must not corrupt the simulation; by the time a
/// callback runs the engine state has already advanced.
pub trait GameObserver: Send + Sync + Clone + 'static {
    fn state_changed(&self, snapshot: GameSnapshot) -> impl Future<Output = ()> + Send;

    fn run_finished(
        &self,
        report: RunReport,
        snapshot: GameSnapshot,
    ) -> impl Future<Output = ()> + Send;
}
