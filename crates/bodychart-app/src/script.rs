//! Scripted editing sessions.
//!
//! A script is a JSON document listing the commands a user would issue
//! against the surface, in order:
//!
//! ```json
//! {
//!   "commands": [
//!     { "op": "select_color", "color": "#8B4513" },
//!     { "op": "pointer", "event": { "type": "down", "position": { "x": 10, "y": 10 } } },
//!     { "op": "pointer", "event": { "type": "move", "position": { "x": 90, "y": 40 } } },
//!     { "op": "pointer", "event": { "type": "up", "position": { "x": 90, "y": 40 } } },
//!     { "op": "undo" },
//!     { "op": "save" }
//!   ]
//! }
//! ```

use crate::error::{AppError, AppResult};
use bodychart_core::{AnnotationSurface, ExportedImage, InkColor, PointerEvent, PointerOutcome, ToolKind};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// One editor command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Pointer { event: PointerEvent },
    SelectTool { tool: ToolKind },
    SelectColor { color: InkColor },
    SelectBrushWidth { width: f32 },
    Undo,
    Redo,
    Clear,
    /// The canvas is now shown at `rect` on screen.
    Display { rect: Rect },
    Save,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Script {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &std::path::Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Counters gathered while replaying a script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub commands: usize,
    pub committed: usize,
    pub ignored: usize,
}

/// Replay `script` against `surface`, returning every image produced by a
/// `save` command.
pub fn replay(surface: &mut AnnotationSurface, script: &Script) -> AppResult<(ReplayStats, Vec<ExportedImage>)> {
    let mut stats = ReplayStats::default();
    let mut saves = Vec::new();

    for command in &script.commands {
        stats.commands += 1;
        let applied = match command {
            Command::Pointer { event } => match surface.handle_pointer(*event) {
                PointerOutcome::Ignored => false,
                PointerOutcome::Committed => {
                    stats.committed += 1;
                    true
                }
                _ => true,
            },
            Command::SelectTool { tool } => {
                surface.select_tool(*tool);
                true
            }
            Command::SelectColor { color } => surface.select_color(*color),
            Command::SelectBrushWidth { width } => surface.select_brush_width(*width),
            Command::Undo => surface.undo(),
            Command::Redo => surface.redo(),
            Command::Clear => {
                let committed = surface.clear();
                if committed {
                    stats.committed += 1;
                }
                committed
            }
            Command::Display { rect } => {
                surface.set_displayed_rect(*rect);
                true
            }
            Command::Save => {
                saves.push(surface.save()?);
                true
            }
        };
        if !applied {
            log::debug!("Command {} had no effect: {:?}", stats.commands, command);
            stats.ignored += 1;
        }
    }

    log::info!(
        "Replayed {} commands ({} committed, {} without effect); history {}/{}",
        stats.commands,
        stats.committed,
        stats.ignored,
        surface.history_cursor() + 1,
        surface.history_len()
    );
    Ok((stats, saves))
}
