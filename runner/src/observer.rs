use std::sync::{Arc, Mutex};

use snake_engine::{GameObserver, GameSnapshot, RunReport};
use tokio::sync::mpsc;

/// Bridges session callbacks to the pilot loop: keeps the latest snapshot
/// around for steering and forwards terminal reports for submission.
#[derive(Clone)]
pub struct RunnerObserver {
    latest: Arc<Mutex<Option<GameSnapshot>>>,
    reports: mpsc::UnboundedSender<RunReport>,
}

impl RunnerObserver {
    pub fn create() -> (Self, mpsc::UnboundedReceiver<RunReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                latest: Arc::new(Mutex::new(None)),
                reports: tx,
            },
            rx,
        )
    }

    pub fn latest_snapshot(&self) -> Option<GameSnapshot> {
        self.latest.lock().unwrap().clone()
    }
}

impl GameObserver for RunnerObserver {
    async fn state_changed(&self, snapshot: GameSnapshot) {
        *self.latest.lock().unwrap() = Some(snapshot);
    }

    async fn run_finished(&self, report: RunReport, _snapshot: GameSnapshot) {
        let _ = self.reports.send(report);
    }
}
