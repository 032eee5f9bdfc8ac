//! Runtime configuration
//!
//! Values come from the command line, falling back to `FLOWTTY_*`
//! environment variables and then to the defaults below.

use crate::engine::policy::{Pace, DEFAULT_PLAYBACK_RATE, DEFAULT_SPEED_MS};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on how long the UI waits for input before checking the timer
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("speed must be a positive number of milliseconds")]
    ZeroSpeed,

    #[error("playback rate must be a positive number, got {0}")]
    InvalidRate(f64),

    #[error("poll interval must be positive")]
    ZeroPollInterval,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub speed_ms: u64,
    pub playback_rate: f64,
    /// Seed for reproducible branch outcomes
    pub seed: Option<u64>,
    pub headless: bool,
    pub log_file: Option<PathBuf>,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            speed_ms: DEFAULT_SPEED_MS,
            playback_rate: DEFAULT_PLAYBACK_RATE,
            seed: None,
            headless: false,
            log_file: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speed_ms == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            return Err(ConfigError::InvalidRate(self.playback_rate));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    pub fn pace(&self) -> Pace {
        Pace {
            speed_ms: self.speed_ms,
            playback_rate: self.playback_rate,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
