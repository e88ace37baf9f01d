//! Kinematic limits and sampling settings, loadable from TOML.
//!
//! ```toml
//! [limits]
//! j_max = 240000.0
//! a_max = 3600.0
//!
//! [sampling]
//! period = 0.001
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::accel_curve::DEFAULT_J_MAX;
use crate::profile::DEFAULT_STEP;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub limits: MotionLimits,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

/// Kinematic limits of one axis, shared by consecutive moves.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MotionLimits {
    /// Maximum jerk magnitude [mm/s/s/s]
    #[serde(default = "default_j_max")]
    pub j_max: f64,
    /// Maximum acceleration magnitude [mm/s/s]
    #[serde(default = "default_a_max")]
    pub a_max: f64,
}

impl MotionLimits {
    pub fn new(j_max: f64, a_max: f64) -> Self {
        Self { j_max, a_max }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("limits.j_max", self.j_max)?;
        positive("limits.a_max", self.a_max)
    }
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            j_max: default_j_max(),
            a_max: default_a_max(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SamplingConfig {
    /// Control period used for sampling [s]
    #[serde(default = "default_period")]
    pub period: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
        }
    }
}

fn default_j_max() -> f64 {
    DEFAULT_J_MAX
}

fn default_a_max() -> f64 {
    3600.0
}

fn default_period() -> f64 {
    DEFAULT_STEP
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        positive("sampling.period", self.sampling.period)
    }
}
