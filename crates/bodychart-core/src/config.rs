//! Surface configuration.

use crate::color::{InkColor, DEFAULT_BRUSH_WIDTH, DEFAULT_BRUSH_WIDTHS, DEFAULT_PALETTE};
use crate::history::HistoryLimit;
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default native canvas width, in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default native canvas height, in pixels.
pub const DEFAULT_HEIGHT: u32 = 500;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// What happens to a stroke in progress when the pointer leaves the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeavePolicy {
    /// Keep the partial stroke and commit it to history.
    #[default]
    Commit,
    /// Drop the partial stroke and restore the overlay to the current entry.
    Discard,
}

/// Settings for an [`AnnotationSurface`](crate::surface::AnnotationSurface).
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Native canvas width in pixels.
    pub width: u32,
    /// Native canvas height in pixels.
    pub height: u32,
    /// Colours the ink tool may use.
    pub palette: Vec<InkColor>,
    /// Brush widths the ink and eraser tools may use.
    pub brush_widths: Vec<f32>,
    pub default_color: InkColor,
    pub default_brush_width: f32,
    pub default_tool: ToolKind,
    /// Undo history depth.
    pub history_limit: HistoryLimit,
    pub leave_policy: LeavePolicy,
    /// Painted in place of the background image until it has loaded.
    pub fallback_fill: InkColor,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette: DEFAULT_PALETTE.to_vec(),
            brush_widths: DEFAULT_BRUSH_WIDTHS.to_vec(),
            default_color: InkColor::black(),
            default_brush_width: DEFAULT_BRUSH_WIDTH,
            default_tool: ToolKind::default(),
            history_limit: HistoryLimit::default(),
            leave_policy: LeavePolicy::default(),
            fallback_fill: InkColor::white(),
        }
    }
}

impl SurfaceConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded surface config from {}", path.display());
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the invariants the surface relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette is empty".to_string()));
        }
        if self.brush_widths.is_empty() {
            return Err(ConfigError::Invalid("brush width set is empty".to_string()));
        }
        if let Some(bad) = self
            .brush_widths
            .iter()
            .find(|w| !w.is_finite() || **w <= 0.0)
        {
            return Err(ConfigError::Invalid(format!("invalid brush width {}", bad)));
        }
        if !self.palette.contains(&self.default_color) {
            return Err(ConfigError::Invalid(format!(
                "default color {} is not in the palette",
                self.default_color
            )));
        }
        if !self.brush_widths.contains(&self.default_brush_width) {
            return Err(ConfigError::Invalid(format!(
                "default brush width {} is not in the width set",
                self.default_brush_width
            )));
        }
        if let HistoryLimit::Depth(0) = self.history_limit {
            return Err(ConfigError::Invalid(
                "history depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SurfaceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 500);
        assert_eq!(config.history_limit, HistoryLimit::Depth(50));
        assert_eq!(config.leave_policy, LeavePolicy::Commit);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SurfaceConfig::from_json(r#"{ "width": 400, "leave_policy": "discard" }"#).unwrap();
        assert_eq!(config.width, 400);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.leave_policy, LeavePolicy::Discard);
        assert_eq!(config.palette.len(), 4);
    }

    #[test]
    fn test_history_limit_json() {
        let config = SurfaceConfig::from_json(r#"{ "history_limit": "unbounded" }"#).unwrap();
        assert_eq!(config.history_limit, HistoryLimit::Unbounded);

        let config = SurfaceConfig::from_json(r#"{ "history_limit": { "depth": 10 } }"#).unwrap();
        assert_eq!(config.history_limit, HistoryLimit::Depth(10));
    }

    #[test]
    fn test_rejects_zero_size() {
        let result = SurfaceConfig::from_json(r#"{ "width": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_default_color_outside_palette() {
        let result = SurfaceConfig::from_json(r##"{ "default_color": "#123456" }"##);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_depth() {
        let result = SurfaceConfig::from_json(r#"{ "history_limit": { "depth": 0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(SurfaceConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SurfaceConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SurfaceConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surface.json");
        fs::write(&path, r#"{ "height": 250 }"#).unwrap();

        let config = SurfaceConfig::load(&path).unwrap();
        assert_eq!(config.height, 250);

        let missing = SurfaceConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
