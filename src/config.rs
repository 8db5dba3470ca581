//! Configuration for the Habitus engine.
//!
//! All classifier thresholds and debounce windows are tunable here and
//! default to the values the detectors shipped with.

use crate::dashboard::DashboardTuning;
use crate::sensors::{ExerciseTuning, GyroTuning, LightTuning, StepTuning};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the preference file
    pub data_path: PathBuf,

    /// Light classifier thresholds
    #[serde(default)]
    pub light: LightTuning,

    /// Step classifier thresholds
    #[serde(default)]
    pub step: StepTuning,

    /// Exercise classifier thresholds
    #[serde(default)]
    pub exercise: ExerciseTuning,

    /// Gyroscope classifier thresholds
    #[serde(default)]
    pub gyro: GyroTuning,

    /// Dashboard-level grace and debounce windows
    #[serde(default)]
    pub dashboard: DashboardTuning,
}

impl Default for Config {
    fn default() -> Self {
        let data_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("habitus");

        Self {
            data_path,
            light: LightTuning::default(),
            step: StepTuning::default(),
            exercise: ExerciseTuning::default(),
            gyro: GyroTuning::default(),
            dashboard: DashboardTuning::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("habitus")
            .join("config.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
