use std::fs::File;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Ten years; longer horizons only add rows nobody reads.
pub const MAX_CONTINUOUS_HORIZON_DAYS: u32 = 3650;

/// Tunables for the allocator and the drag solver. Every field has a default,
/// so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on steps taken while expanding a recurring pattern.
    pub max_recurring_iterations: u32,
    /// Allocation horizon for continuous projects when the caller gives none.
    pub continuous_horizon_days: u32,
    /// Empty days required between two bars on the same row.
    pub min_gap_days: u32,
    /// Empty days required between two holidays. Zero allows adjacency.
    pub holiday_min_gap_days: u32,
    /// Coalescing window for visual drag updates.
    pub flush_interval_ms: u64,
    /// Entries kept by a [`crate::WorkingDayCache`] built from this config.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_recurring_iterations: 500,
            continuous_horizon_days: 365,
            min_gap_days: 1,
            holiday_min_gap_days: 0,
            flush_interval_ms: 100,
            cache_capacity: 4096,
        }
    }
}

impl EngineConfig {
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: EngineConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_recurring_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_recurring_iterations must be at least 1".into(),
            ));
        }
        if self.continuous_horizon_days > MAX_CONTINUOUS_HORIZON_DAYS {
            return Err(ConfigError::Invalid(format!(
                "continuous_horizon_days must be at most {MAX_CONTINUOUS_HORIZON_DAYS}"
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache_capacity must be at least 1".into(),
            ));
        }
        if self.flush_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "flush_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}
