//! Runtime configuration, read from `config.json` in the platform config dir.
//!
//! A missing file means defaults. Values are validated on load.

use crate::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_SAMPLE_WINDOW_MS};
use crate::error::{AppError, ConfigError};
use crate::validation::{validate_poll_interval_ms, validate_sample_window_ms};
use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub poll_interval_ms: u64,
    pub sample_window_ms: u64,
    /// Show the same-day usage line on the overlay.
    pub show_usage_total: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            sample_window_ms: DEFAULT_SAMPLE_WINDOW_MS,
            show_usage_total: true,
        }
    }
}

impl AppConfig {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate().map_err(|e| ConfigError::Invalid(Box::new(e)))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_poll_interval_ms(self.poll_interval_ms)?;
        validate_sample_window_ms(self.sample_window_ms, self.poll_interval_ms)?;
        Ok(())
    }

    pub fn monitor(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            sample_window: Duration::from_millis(self.sample_window_ms),
        }
    }
}

/// Timing of the monitor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub sample_window: Duration,
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("com", "nudge", "Nudge").ok_or(ConfigError::NoProjectDirs)?;
    Ok(proj_dirs.config_dir().join(CONFIG_FILE_NAME))
}
