use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub grid_size: usize,
    pub initial_tick_interval_ms: u64,
    pub min_tick_interval_ms: u64,
    pub speed_step_ms: u64,
    pub food_reward: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            grid_size: 16,
            initial_tick_interval_ms: 160,
            min_tick_interval_ms: 80,
            speed_step_ms: 6,
            food_reward: 10,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 8 || self.grid_size > 64 {
            return Err("Grid size must be between 8 and 64".to_string());
        }
        if self.initial_tick_interval_ms < 50 || self.initial_tick_interval_ms > 5000 {
            return Err("Tick interval must be between 50ms and 5000ms".to_string());
        }
        if self.min_tick_interval_ms < 20
            || self.min_tick_interval_ms > self.initial_tick_interval_ms
        {
            return Err(
                "Minimum tick interval must be between 20ms and the initial interval".to_string(),
            );
        }
        if self.speed_step_ms == 0 {
            return Err("Speed step must be positive".to_string());
        }
        if self.food_reward == 0 {
            return Err("Food reward must be positive".to_string());
        }
        Ok(())
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_tick_interval_ms)
    }
}
