use serde::{Deserialize, Serialize};
use snake_engine::EngineSettings;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub engine: EngineSettings,
    pub seed: Option<u64>,
    pub runs: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            seed: None,
            runs: 3,
        }
    }
}

impl RunnerConfig {
    /// No path means defaults; a present but unreadable or invalid file is
    /// an error.
    pub fn load(path: Option<&str>) -> Result<Self, String> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .map_err(|e| format!("Failed to parse config file {}: {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.engine.validate()?;
        if self.runs == 0 {
            return Err("Runs must be positive".to_string());
        }
        Ok(())
    }
}
