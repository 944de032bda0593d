//! Glide configuration file handling

use anyhow::{Context, Result};
use glide_scroll::DecelerationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "glide.toml";

/// Top-level Glide configuration (glide.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GlideConfig {
    #[serde(default)]
    pub deceleration: DecelerationConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Virtual display and scroll view used by `glide simulate`
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Display refresh rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Hard cap on simulated frames
    #[serde(default = "default_max_frames")]
    pub max_frames: u64,
    #[serde(default = "default_content_height")]
    pub content_height: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
}

fn default_fps() -> u32 {
    60
}

fn default_max_frames() -> u64 {
    10_000
}

fn default_content_height() -> f64 {
    5000.0
}

fn default_viewport_height() -> f64 {
    800.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            max_frames: default_max_frames(),
            content_height: default_content_height(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl GlideConfig {
    /// Load an explicit config file, or `glide.toml` in the working directory if present
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None if Path::new(CONFIG_FILE).is_file() => {
                Self::load_from_file(Path::new(CONFIG_FILE))
            }
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GlideConfig = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.deceleration.validate()?;
        if self.simulation.fps == 0 {
            anyhow::bail!("simulation.fps must be greater than zero");
        }
        if !(self.simulation.viewport_height > 0.0) {
            anyhow::bail!("simulation.viewport_height must be positive");
        }
        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
