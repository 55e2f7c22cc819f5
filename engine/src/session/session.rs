use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use super::observer::GameObserver;
use crate::game::{Direction, EngineSettings, GameSnapshot, GameState, Phase, RunReport, TickOutcome};
use crate::session_rng::SessionRng;

/// One player session driving one engine instance. Commands and the ticker
/// funnel through the state mutex, so nothing interleaves with an in-flight
/// tick. The ticker task is cancelled and recreated whenever the interval
/// changes; it never runs at a stale rate.
pub struct SnakeSession<O: GameObserver> {
    state: Arc<Mutex<GameState>>,
    rng: Arc<Mutex<SessionRng>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    observer: O,
}

impl<O: GameObserver> SnakeSession<O> {
    pub async fn create(
        settings: EngineSettings,
        mut rng: SessionRng,
        observer: O,
    ) -> Result<Self, String> {
        settings.validate()?;
        let state = GameState::new(settings, &mut rng);
        let snapshot = state.snapshot();
        let session = Self {
            state: Arc::new(Mutex::new(state)),
            rng: Arc::new(Mutex::new(rng)),
            ticker: Arc::new(Mutex::new(None)),
            observer,
        };
        session.observer.state_changed(snapshot).await;
        Ok(session)
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Starts a fresh run or resumes a paused one. A no-op while already
    /// running or after the run is over (use `restart` for a new run).
    pub async fn start(&self) {
        let snapshot = {
            let mut state = self.state.lock().await;
            match state.phase() {
                Phase::Running | Phase::Over => return,
                Phase::Idle | Phase::Paused => {}
            }
            state.start();
            state.snapshot()
        };
        self.observer.state_changed(snapshot).await;
        self.spawn_ticker().await;
    }

    /// Cancels any pending tick and freezes the run. Idempotent.
    pub async fn pause(&self) {
        self.cancel_ticker().await;
        let snapshot = {
            let mut state = self.state.lock().await;
            state.pause();
            state.snapshot()
        };
        self.observer.state_changed(snapshot).await;
    }

    /// Abandons the current run and reinitializes with a fresh session
    /// token.
    pub async fn reset(&self) {
        self.cancel_ticker().await;
        let snapshot = {
            let mut state = self.state.lock().await;
            let mut rng = self.rng.lock().await;
            state.reset(&mut rng);
            state.snapshot()
        };
        self.observer.state_changed(snapshot).await;
    }

    pub async fn restart(&self) {
        self.reset().await;
        self.start().await;
    }

    pub async fn change_direction(&self, direction: Direction) {
        self.state.lock().await.change_direction(direction);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_slot = self.ticker.lock().await;
        if ticker_slot.is_some() {
            return;
        }

        let state = Arc::clone(&self.state);
        let rng = Arc::clone(&self.rng);
        let ticker = Arc::clone(&self.ticker);
        let observer = self.observer.clone();
        let mut period = { state.lock().await.tick_interval() };

        let handle = tokio::spawn(async move {
            // interval_at: the first firing lands one full period out, and a
            // recreated timer never fires immediately after a reschedule.
            let mut timer = interval_at(Instant::now() + period, period);
            loop {
                timer.tick().await;

                let (outcome, snapshot) = {
                    let mut state = state.lock().await;
                    let mut rng = rng.lock().await;
                    let outcome = state.tick(&mut rng);
                    (outcome, state.snapshot())
                };

                match outcome {
                    TickOutcome::Skipped => break,
                    TickOutcome::Advanced { ate_food } => {
                        observer.state_changed(snapshot.clone()).await;
                        if ate_food {
                            let new_period = Duration::from_millis(snapshot.tick_interval_ms);
                            if new_period != period {
                                period = new_period;
                                timer = interval_at(Instant::now() + period, period);
                            }
                        }
                    }
                    TickOutcome::Ended(_) => {
                        let report = RunReport::from_snapshot(&snapshot);
                        observer.state_changed(snapshot.clone()).await;
                        observer.run_finished(report, snapshot).await;
                        ticker.lock().await.take();
                        break;
                    }
                }
            }
        });
        *ticker_slot = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;

    use tokio::sync::mpsc;

    use super::*;
    use crate::game::{EndReason, Point};

    #[derive(Clone)]
    struct RecordingObserver {
        snapshots: Arc<StdMutex<Vec<GameSnapshot>>>,
        reports: mpsc::UnboundedSender<RunReport>,
    }

    impl RecordingObserver {
        fn create() -> (Self, mpsc::UnboundedReceiver<RunReport>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Self {
                    snapshots: Arc::new(StdMutex::new(Vec::new())),
                    reports: tx,
                },
                rx,
            )
        }

        fn last_snapshot(&self) -> Option<GameSnapshot> {
            self.snapshots.lock().unwrap().last().cloned()
        }
    }

    impl GameObserver for RecordingObserver {
        async fn state_changed(&self, snapshot: GameSnapshot) {
            self.snapshots.lock().unwrap().push(snapshot);
        }

        async fn run_finished(&self, report: RunReport, _snapshot: GameSnapshot) {
            let _ = self.reports.send(report);
        }
    }

    fn fast_settings() -> EngineSettings {
        EngineSettings {
            initial_tick_interval_ms: 50,
            min_tick_interval_ms: 20,
            ..EngineSettings::default()
        }
    }

    #[tokio::test]
    async fn test_session_ticks_while_running() {
        let (observer, _rx) = RecordingObserver::create();
        let session = SnakeSession::create(fast_settings(), SessionRng::new(1), observer.clone())
            .await
            .expect("settings are valid");

        session.start().await;
        tokio::time::sleep(Duration::from_millis(180)).await;
        session.pause().await;

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Paused);
        assert!(snapshot.tick >= 2, "expected ticks, got {}", snapshot.tick);
    }

    #[tokio::test]
    async fn test_pause_stops_ticking_and_is_idempotent() {
        let (observer, _rx) = RecordingObserver::create();
        let session = SnakeSession::create(fast_settings(), SessionRng::new(1), observer.clone())
            .await
            .expect("settings are valid");

        session.start().await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        session.pause().await;
        session.pause().await;

        let frozen = session.snapshot().await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        let later = session.snapshot().await;

        assert_eq!(later.phase, Phase::Paused);
        assert_eq!(later.tick, frozen.tick);
        assert_eq!(later.duration_ms, frozen.duration_ms);
    }

    #[tokio::test]
    async fn test_run_finishes_with_terminal_report() {
        let (observer, mut rx) = RecordingObserver::create();
        let session = SnakeSession::create(fast_settings(), SessionRng::new(1), observer.clone())
            .await
            .expect("settings are valid");

        // Head for the right wall and never turn; 16 cells at 50ms each is
        // comfortably inside the timeout.
        session.start().await;
        let report = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("run should hit the wall")
            .expect("observer sends exactly one report");

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Over);
        assert_eq!(snapshot.end_reason, Some(EndReason::WallCollision));
        assert_eq!(report.session_token, snapshot.session_token);
        assert!(report.length >= 3);
        assert_eq!(report.score % 10, 0);
        assert!(report.max_tick_rate_hz > 0.0);

        // Frozen after the terminal tick.
        let later = session.snapshot().await;
        assert_eq!(later.tick, snapshot.tick);
        assert_eq!(
            observer.last_snapshot().map(|s| s.phase),
            Some(Phase::Over)
        );
    }

    #[tokio::test]
    async fn test_restart_mints_new_token_and_runs_again() {
        let (observer, mut rx) = RecordingObserver::create();
        let session = SnakeSession::create(fast_settings(), SessionRng::new(1), observer.clone())
            .await
            .expect("settings are valid");

        session.start().await;
        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("first run ends")
            .expect("report");

        session.restart().await;
        let running = session.snapshot().await;
        assert_eq!(running.phase, Phase::Running);
        assert_ne!(running.session_token, first.session_token);
        assert_eq!(running.score, 0);

        let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("second run ends")
            .expect("report");
        assert_ne!(second.session_token, first.session_token);
    }

    #[tokio::test]
    async fn test_direction_commands_steer_the_run() {
        let (observer, _rx) = RecordingObserver::create();
        let session = SnakeSession::create(fast_settings(), SessionRng::new(1), observer.clone())
            .await
            .expect("settings are valid");

        session.start().await;
        session.change_direction(Direction::Down).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        session.pause().await;

        let snapshot = session.snapshot().await;
        let head = snapshot.snake.first().copied().expect("non-empty snake");
        assert_eq!(snapshot.direction, Direction::Down);
        assert!(head.y > 8, "head should have moved down, got {:?}", head);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_settings() {
        let (observer, _rx) = RecordingObserver::create();
        let settings = EngineSettings {
            grid_size: 2,
            ..EngineSettings::default()
        };
        assert!(
            SnakeSession::create(settings, SessionRng::new(1), observer)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_initial_snapshot_emitted_on_create() {
        let (observer, _rx) = RecordingObserver::create();
        let _session =
            SnakeSession::create(fast_settings(), SessionRng::new(1), observer.clone())
                .await
                .expect("settings are valid");

        let snapshot = observer.last_snapshot().expect("creation emits a snapshot");
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.snake.first(), Some(&Point::new(9, 8)));
    }
}
