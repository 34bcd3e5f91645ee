//! Host configuration, loaded from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use range_sim::engine::SimConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("frame_rate_hz must be positive")]
    ZeroFrameRate,
}

/// Everything needed to run one session. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sim: SimConfig,
    /// Target frame rate of the game loop.
    pub frame_rate_hz: u32,
    /// How long the session runs before the host stops it (seconds).
    pub duration_secs: f64,
    /// Step the engine as fast as possible with a fixed frame time instead
    /// of running the real-time game loop thread.
    pub headless: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            frame_rate_hz: 60,
            duration_secs: 200.0,
            headless: true,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate_hz == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        Ok(())
    }

    /// Fixed frame time for headless runs (ms).
    pub fn frame_ms(&self) -> f64 {
        1000.0 / f64::from(self.frame_rate_hz.max(1))
    }
}
