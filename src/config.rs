//=========================================================================
// Engine Configuration
//=========================================================================
//
// Serializable settings for the window and the main loop.
//
// Configuration is loaded from TOML by the entry point (or built in code)
// and handed to the EngineBuilder. Every field has a default, so a config
// file only needs the values it changes.
//
// Example `engine.toml`:
// ```toml
// target_fps = 30
// queue_capacity = 256
//
// [window]
// title = "Minesweeper"
// width = 640
// height = 480
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

//=== Internal Dependencies ===============================================

use crate::error::ConfigError;

//=== WindowConfig ========================================================

/// Window creation settings consumed by [`crate::core::Display::create`].
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    #[default(String::from("Cinder Engine"))]
    pub title: String,

    /// Initial width in logical pixels.
    #[default = 800]
    pub width: u32,

    /// Initial height in logical pixels.
    #[default = 600]
    pub height: u32,

    #[default = true]
    pub resizable: bool,
}

//=== EngineConfig ========================================================

/// Main loop settings.
#[derive(Debug, Clone, PartialEq, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Frames per second the loop paces itself to; `0` disables pacing.
    #[default = 60]
    pub target_fps: u32,

    /// Event queue capacity; absent means unbounded.
    #[default(None)]
    pub queue_capacity: Option<usize>,

    /// Push an `engine.frame_rate` Info message once per second.
    #[default = true]
    pub frame_rate_report: bool,

    // Serialized as a TOML table, so it must stay the last field.
    pub window: WindowConfig,
}

impl EngineConfig {
    //--- Loading ----------------------------------------------------------

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    //--- Validation -------------------------------------------------------

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.queue_capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "queue_capacity must be positive (omit it for unbounded)".into(),
            ));
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.window.title, "Cinder Engine");
        assert_eq!((config.window.width, config.window.height), (800, 600));
        assert!(config.window.resizable);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.queue_capacity, None);
        assert!(config.frame_rate_report);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            target_fps = 30

            [window]
            title = "Test"
            "#,
        )
        .unwrap();

        assert_eq!(config.target_fps, 30);
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.queue_capacity, None);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = EngineConfig::default();
        config.queue_capacity = Some(128);
        config.window.width = 320;

        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = EngineConfig::from_toml_str("queue_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_window_rejected() {
        let err = EngineConfig::from_toml_str("[window]\nwidth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = EngineConfig::from_toml_str("target_fps = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::from_path("/definitely/not/here/engine.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
