//! Pointer pipeline configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::input::normalizer::DEFAULT_EMULATION_WINDOW_MS;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tunables of the pointer pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// A `mousedown` arriving this soon after `touchstart` is treated as
    /// touch emulation and dropped
    pub mouse_emulation_window_ms: f64,

    /// Synthesize `dblclick` from consecutive touch clicks
    pub emulate_touch_double_click: bool,

    /// Click count at which a double click fires
    pub double_click_count: u32,

    /// Maximum gap between counted clicks; unset means no time limit
    pub double_click_window_ms: Option<f64>,

    /// Keep separate state per host pointer identity instead of one ambient
    /// pointer
    pub track_pointer_identity: bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            mouse_emulation_window_ms: DEFAULT_EMULATION_WINDOW_MS,
            emulate_touch_double_click: true,
            double_click_count: 2,
            double_click_window_ms: None,
            track_pointer_identity: true,
        }
    }
}

impl PointerConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PointerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mouse_emulation_window_ms < 0.0 {
            return Err(ConfigError::Invalid(
                "mouse_emulation_window_ms must not be negative".to_string(),
            ));
        }
        if self.double_click_count == 0 {
            return Err(ConfigError::Invalid(
                "double_click_count must be at least 1".to_string(),
            ));
        }
        if matches!(self.double_click_window_ms, Some(window) if window < 0.0) {
            return Err(ConfigError::Invalid(
                "double_click_window_ms must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
