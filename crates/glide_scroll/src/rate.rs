//! Named deceleration rates and release requests

use std::fmt;
use std::str::FromStr;

use glide_core::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Fraction of velocity kept per millisecond for a normal glide
pub const NORMAL_RATE: f64 = 0.998;

/// Fraction of velocity kept per millisecond for a fast-stopping glide
pub const FAST_RATE: f64 = 0.99;

/// Named deceleration rate
///
/// The numeric value comes from [`DecelerationConfig`](crate::DecelerationConfig),
/// which defaults to [`NORMAL_RATE`] and [`FAST_RATE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecelerationRate {
    /// Long glide (default)
    #[default]
    Normal,
    /// Short glide, stops quickly
    Fast,
}

impl DecelerationRate {
    /// Default numeric rate for this name
    pub fn value(self) -> f64 {
        match self {
            DecelerationRate::Normal => NORMAL_RATE,
            DecelerationRate::Fast => FAST_RATE,
        }
    }
}

impl fmt::Display for DecelerationRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecelerationRate::Normal => f.write_str("normal"),
            DecelerationRate::Fast => f.write_str("fast"),
        }
    }
}

impl FromStr for DecelerationRate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(DecelerationRate::Normal),
            "fast" => Ok(DecelerationRate::Fast),
            other => Err(ConfigError::UnknownRate(other.to_string())),
        }
    }
}

/// A release event: the velocity observed at lift-off and the rate to glide at
///
/// Two requests are equal only when velocity and rate match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecelerationRequest {
    /// Raw release velocity (vertical component is scaled by the decelerator)
    pub velocity: Vec2,
    pub rate: DecelerationRate,
}

impl DecelerationRequest {
    pub fn new(velocity: Vec2, rate: DecelerationRate) -> Self {
        Self { velocity, rate }
    }
}
