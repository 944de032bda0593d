//! Deceleration tuning
//!
//! Loaded from a `[deceleration]` table (or a standalone TOML document) and
//! validated before a [`Decelerator`](crate::Decelerator) is built. Every
//! field has a default, so an empty table yields the stock behavior.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rate::{DecelerationRate, FAST_RATE, NORMAL_RATE};

/// Errors from loading or validating deceleration settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A decay rate outside the open interval (0, 1)
    #[error("Deceleration rate `{name}` must be in (0, 1), got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    /// A stop threshold that is not a positive finite number
    #[error("Stop threshold must be a positive finite number, got {0}")]
    InvalidThreshold(f64),

    /// A rate name that is neither `normal` nor `fast`
    #[error("Unknown deceleration rate `{0}` (expected `normal` or `fast`)")]
    UnknownRate(String),

    /// Malformed TOML
    #[error("Failed to parse deceleration config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tuning for momentum glides
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DecelerationConfig {
    /// Curve speed at which a glide counts as stopped
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Numeric value of [`DecelerationRate::Normal`]
    #[serde(default = "default_normal_rate")]
    pub normal_rate: f64,
    /// Numeric value of [`DecelerationRate::Fast`]
    #[serde(default = "default_fast_rate")]
    pub fast_rate: f64,
}

fn default_threshold() -> f64 {
    0.1
}

fn default_normal_rate() -> f64 {
    NORMAL_RATE
}

fn default_fast_rate() -> f64 {
    FAST_RATE
}

impl Default for DecelerationConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            normal_rate: default_normal_rate(),
            fast_rate: default_fast_rate(),
        }
    }
}

impl DecelerationConfig {
    /// Parse and validate a TOML document holding the config fields at top level
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DecelerationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        for (name, value) in [("normal", self.normal_rate), ("fast", self.fast_rate)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        Ok(())
    }

    /// Numeric decay rate for a named rate
    pub fn rate(&self, rate: DecelerationRate) -> f64 {
        match rate {
            DecelerationRate::Normal => self.normal_rate,
            DecelerationRate::Fast => self.fast_rate,
        }
    }

    /// Factor applied to the vertical release velocity before building a curve
    ///
    /// `1000 * threshold` puts the release velocity in the same units as the
    /// curve's stop speed. The horizontal component is left unscaled.
    pub fn velocity_scale(&self) -> f64 {
        1000.0 * self.threshold
    }
}
