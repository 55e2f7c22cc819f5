use std::time::{Duration, Instant};

use crate::identifiers::SessionToken;
use crate::log;
use crate::session_rng::SessionRng;

use super::settings::EngineSettings;
use super::snake::SnakeBody;
use super::snapshot::{GameSnapshot, RunReport};
use super::types::{Direction, EndReason, Phase, Point};

const SPAWN_DIRECTION: Direction = Direction::Right;

/// What a tick did, so the scheduling harness knows whether to reschedule
/// or stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not running; nothing changed.
    Skipped,
    /// The snake advanced. `ate_food` implies the tick interval shortened
    /// and the timer must be recreated at the new rate.
    Advanced { ate_food: bool },
    /// The run ended on this tick; the snake geometry is untouched.
    Ended(EndReason),
}

/// Single-run simulation state. All mutation goes through the command
/// methods; invalid commands are silent no-ops.
#[derive(Debug)]
pub struct GameState {
    settings: EngineSettings,
    snake: SnakeBody,
    direction: Direction,
    pending_direction: Option<Direction>,
    food: Option<Point>,
    score: u32,
    tick_interval_ms: u64,
    max_tick_rate_hz: f64,
    phase: Phase,
    end_reason: Option<EndReason>,
    session_token: SessionToken,
    tick_count: u64,
    resumed_at: Option<Instant>,
    accumulated: Duration,
}

impl GameState {
    pub fn new(settings: EngineSettings, rng: &mut SessionRng) -> Self {
        let snake = SnakeBody::spawn(settings.grid_size);
        let food = spawn_food(settings.grid_size, &snake, rng);
        let tick_interval_ms = settings.initial_tick_interval_ms;
        Self {
            snake,
            direction: SPAWN_DIRECTION,
            pending_direction: None,
            food,
            score: 0,
            tick_interval_ms,
            max_tick_rate_hz: tick_rate_hz(tick_interval_ms),
            phase: Phase::Idle,
            end_reason: None,
            session_token: SessionToken::mint(),
            tick_count: 0,
            resumed_at: None,
            accumulated: Duration::ZERO,
            settings,
        }
    }

    /// Reinitializes the run and mints a fresh session token. The previous
    /// token is never reused.
    pub fn reset(&mut self, rng: &mut SessionRng) {
        *self = GameState::new(self.settings.clone(), rng);
    }

    /// Starts a fresh run or resumes a paused one. A no-op while already
    /// running; the only way out of `Over` is `reset`.
    pub fn start(&mut self) {
        match self.phase {
            Phase::Idle | Phase::Paused => {
                self.phase = Phase::Running;
                self.resumed_at = Some(Instant::now());
            }
            Phase::Running | Phase::Over => {}
        }
    }

    /// Idempotent; freezes the duration clock.
    pub fn pause(&mut self) {
        self.freeze_clock();
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    /// Buffers a turn for the next tick. A turn opposite to the direction
    /// the snake is currently moving is dropped; the check is against the
    /// current direction, not the pending one, so at most one turn per tick
    /// window is honored.
    pub fn change_direction(&mut self, direction: Direction) {
        if direction.is_opposite(&self.direction) {
            return;
        }
        self.pending_direction = Some(direction);
    }

    /// Advances the snake by one cell. The sole mutator of snake geometry.
    pub fn tick(&mut self, rng: &mut SessionRng) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Skipped;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }

        let next_head = match self.next_head_cell() {
            Ok(cell) => cell,
            Err(reason) => return self.finish(reason),
        };
        let ate_food = self.food == Some(next_head);

        // The vacating tail cell is fair game, unless this move grows the
        // snake and the tail stays put.
        if self.snake.contains(&next_head) && (ate_food || next_head != self.snake.tail()) {
            return self.finish(EndReason::SelfCollision);
        }

        self.snake.advance(next_head, ate_food);
        self.tick_count += 1;

        if ate_food {
            self.score += self.settings.food_reward;
            self.shorten_interval();
            self.food = spawn_food(self.settings.grid_size, &self.snake, rng);
            log!(
                "[{}] ate food at ({}, {}). Score: {}",
                self.session_token,
                next_head.x,
                next_head.y,
                self.score
            );
        }

        TickOutcome::Advanced { ate_food }
    }

    fn next_head_cell(&self) -> Result<Point, EndReason> {
        let head = self.snake.head();
        let max = self.settings.grid_size - 1;
        let cell = match self.direction {
            Direction::Up => {
                if head.y == 0 {
                    return Err(EndReason::WallCollision);
                }
                Point::new(head.x, head.y - 1)
            }
            Direction::Down => {
                if head.y >= max {
                    return Err(EndReason::WallCollision);
                }
                Point::new(head.x, head.y + 1)
            }
            Direction::Left => {
                if head.x == 0 {
                    return Err(EndReason::WallCollision);
                }
                Point::new(head.x - 1, head.y)
            }
            Direction::Right => {
                if head.x >= max {
                    return Err(EndReason::WallCollision);
                }
                Point::new(head.x + 1, head.y)
            }
        };
        Ok(cell)
    }

    fn finish(&mut self, reason: EndReason) -> TickOutcome {
        self.freeze_clock();
        self.phase = Phase::Over;
        self.end_reason = Some(reason);
        log!(
            "[{}] run over: {:?} at tick {}. Score: {}",
            self.session_token,
            reason,
            self.tick_count,
            self.score
        );
        TickOutcome::Ended(reason)
    }

    fn freeze_clock(&mut self) {
        if let Some(resumed_at) = self.resumed_at.take() {
            self.accumulated += resumed_at.elapsed();
        }
    }

    fn shorten_interval(&mut self) {
        self.tick_interval_ms = self
            .tick_interval_ms
            .saturating_sub(self.settings.speed_step_ms)
            .max(self.settings.min_tick_interval_ms);
        let rate = tick_rate_hz(self.tick_interval_ms);
        if rate > self.max_tick_rate_hz {
            self.max_tick_rate_hz = rate;
        }
    }

    /// Accumulated running time; frozen while paused or over.
    pub fn duration(&self) -> Duration {
        match self.resumed_at {
            Some(resumed_at) => self.accumulated + resumed_at.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn session_token(&self) -> &SessionToken {
        &self.session_token
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            session_token: self.session_token.clone(),
            phase: self.phase,
            tick: self.tick_count,
            snake: self.snake.segments().copied().collect(),
            direction: self.direction,
            food: self.food,
            score: self.score,
            length: self.snake.len(),
            tick_interval_ms: self.tick_interval_ms,
            max_tick_rate_hz: self.max_tick_rate_hz,
            duration_ms: self.duration().as_millis() as u64,
            end_reason: self.end_reason,
        }
    }

    pub fn run_report(&self) -> RunReport {
        RunReport::from_snapshot(&self.snapshot())
    }
}

fn tick_rate_hz(interval_ms: u64) -> f64 {
    1000.0 / interval_ms as f64
}

/// Uniform choice among all cells not occupied by the snake; `None` when the
/// snake fills the grid.
fn spawn_food(grid_size: usize, snake: &SnakeBody, rng: &mut SessionRng) -> Option<Point> {
    let mut free_cells = Vec::with_capacity(grid_size * grid_size - snake.len());
    for y in 0..grid_size {
        for x in 0..grid_size {
            let cell = Point::new(x, y);
            if !snake.contains(&cell) {
                free_cells.push(cell);
            }
        }
    }
    if free_cells.is_empty() {
        return None;
    }
    Some(free_cells[rng.random_range(0..free_cells.len())])
}
