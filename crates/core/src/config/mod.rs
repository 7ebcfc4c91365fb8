use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, TimelineError};

/// Top-level configuration structure for the timeline engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub gesture: GestureConfig,
    pub zoom: ZoomConfig,
    pub region: RegionConfig,
    pub input: InputConfig,
}

impl EngineConfig {
    /// Parses a configuration from JSON. Missing sections fall back to their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.zoom.base > 1.0) {
            return Err(TimelineError::InvalidConfig(format!(
                "zoom base must be greater than 1, got {}",
                self.zoom.base
            )));
        }
        if !(self.zoom.sensitivity > 0.0) {
            return Err(TimelineError::InvalidConfig(format!(
                "zoom sensitivity must be positive, got {}",
                self.zoom.sensitivity
            )));
        }
        Ok(())
    }
}

/// Timing of pointer gesture recognition, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// How long a primary press must last before it becomes a region selection.
    pub hold_delay_ms: u64,
    /// Minimum spacing between two accepted right-clicks.
    pub right_click_throttle_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_delay_ms: 100,
            right_click_throttle_ms: 500,
        }
    }
}

/// Parameters of the exponential wheel zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub base: f64,
    pub sensitivity: f64,
    pub wheel_throttle_ms: u64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            base: 1.02,
            sensitivity: 0.01,
            wheel_throttle_ms: 20,
        }
    }
}

/// What happens when a resize handle is dragged past the opposite edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCrossing {
    /// The dragged edge stops at the opposite edge.
    #[default]
    Clamp,
    /// The edges trade places so the region stays ordered.
    Swap,
    /// The region is passed through inverted.
    Allow,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub edge_crossing: EdgeCrossing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Quiet period after the last keystroke before a typed URL is committed.
    pub url_debounce_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            url_debounce_ms: 1_000,
        }
    }
}
