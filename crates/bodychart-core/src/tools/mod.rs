//! Tool selection state for the annotation surface.

use crate::color::InkColor;
use crate::config::SurfaceConfig;
use crate::stroke::StrokeStyle;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Pointer/select. Reserved for selection; pointer input is ignored.
    Select,
    #[default]
    Ink,
    Eraser,
}

impl ToolKind {
    /// Whether pointer-down with this tool starts a stroke.
    pub fn draws(self) -> bool {
        matches!(self, ToolKind::Ink | ToolKind::Eraser)
    }

    /// Display name for this tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Ink => "Ink",
            ToolKind::Eraser => "Eraser",
        }
    }
}

/// The active tool, colour and brush width, plus the sets they are chosen from.
///
/// Session-scoped; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    current_color: InkColor,
    current_width: f32,
    palette: Vec<InkColor>,
    brush_widths: Vec<f32>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&SurfaceConfig::default())
    }
}

impl ToolSettings {
    /// Create tool settings with the config's sets and defaults.
    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self {
            current_tool: config.default_tool,
            current_color: config.default_color,
            current_width: config.default_brush_width,
            palette: config.palette.clone(),
            brush_widths: config.brush_widths.clone(),
        }
    }

    /// Set the current tool.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    /// Set the ink colour. Colours outside the palette are ignored.
    pub fn select_color(&mut self, color: InkColor) -> bool {
        if !self.palette.contains(&color) {
            log::warn!("Ignoring color {} not in palette", color);
            return false;
        }
        self.current_color = color;
        true
    }

    /// Set the brush width. Widths outside the configured set are ignored.
    pub fn select_brush_width(&mut self, width: f32) -> bool {
        if !self.brush_widths.contains(&width) {
            log::warn!("Ignoring brush width {} not in width set", width);
            return false;
        }
        self.current_width = width;
        true
    }

    pub fn tool(&self) -> ToolKind {
        self.current_tool
    }

    pub fn color(&self) -> InkColor {
        self.current_color
    }

    pub fn brush_width(&self) -> f32 {
        self.current_width
    }

    pub fn palette(&self) -> &[InkColor] {
        &self.palette
    }

    pub fn brush_widths(&self) -> &[f32] {
        &self.brush_widths
    }

    /// Whether pointer-down with the current tool starts a stroke.
    pub fn draws(&self) -> bool {
        self.current_tool.draws()
    }

    /// Snapshot of the settings a new stroke is drawn with.
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            tool: self.current_tool,
            color: self.current_color,
            width: self.current_width,
        }
    }
}
