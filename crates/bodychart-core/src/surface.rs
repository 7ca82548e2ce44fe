//! The annotation surface: background + overlay, pointer-driven strokes,
//! overlay history and flattened export.

use crate::color::InkColor;
use crate::config::{ConfigError, LeavePolicy, SurfaceConfig};
use crate::export::{decode_image_source, encode_png, ExportError, ExportedImage};
use crate::history::History;
use crate::input::{PointerEvent, PointerPhase};
use crate::layer::{Background, BackgroundState, Layer};
use crate::stroke::ActiveStroke;
use crate::tools::{ToolKind, ToolSettings};
use crate::viewport::DisplayMapping;
use kurbo::{Rect, Size};
use thiserror::Error;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// What a pointer event did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Nothing happened (select tool, no stroke in progress, zero-length move).
    Ignored,
    StrokeStarted,
    SegmentDrawn,
    /// The stroke ended and a new history entry was recorded.
    Committed,
    /// The stroke ended but left the overlay as it was; no entry recorded.
    Unchanged,
    /// The stroke was dropped and the overlay restored.
    Discarded,
}

/// A two-layer raster annotation editor with linear undo/redo.
///
/// The surface exclusively owns its background and overlay buffers; callers
/// interact with them only through the operations below. Drawing only ever
/// touches the overlay, and only overlay edits are recorded in history.
#[derive(Debug, Clone)]
pub struct AnnotationSurface {
    config: SurfaceConfig,
    background: Background,
    overlay: Layer,
    history: History,
    tools: ToolSettings,
    mapping: DisplayMapping,
    stroke: Option<ActiveStroke>,
}

impl AnnotationSurface {
    /// Create a surface with an empty overlay and a still-loading background.
    ///
    /// The empty overlay is recorded as history entry 0.
    pub fn new(config: SurfaceConfig) -> SurfaceResult<Self> {
        config.validate()?;

        let overlay = Layer::new(config.width, config.height)?;
        let history = History::new(overlay.clone(), config.history_limit);
        let background = Background::new(config.width, config.height, config.fallback_fill);
        let tools = ToolSettings::from_config(&config);
        let mapping = DisplayMapping::identity(Size::new(config.width as f64, config.height as f64));

        log::debug!("Annotation surface created ({}x{})", config.width, config.height);

        Ok(Self {
            config,
            background,
            overlay,
            history,
            tools,
            mapping,
            stroke: None,
        })
    }

    /// Install the reference background image.
    pub fn set_background(&mut self, image: &Pixmap) -> SurfaceResult<()> {
        self.background.set_image(image)
    }

    /// Decode and install the reference background (raw bytes or data URL).
    ///
    /// On failure the background stays as it was and drawing continues
    /// against the fallback fill.
    pub fn load_background(&mut self, bytes: &[u8]) -> SurfaceResult<()> {
        let image = decode_image_source(bytes).inspect_err(|e| {
            log::warn!("Failed to decode background image: {}", e);
        })?;
        self.set_background(&image)
    }

    /// Open a previously-saved flattened drawing.
    ///
    /// Saved drawings are full composites, so they are layered onto the
    /// background and overlay history restarts from an empty overlay.
    pub fn set_saved_drawing(&mut self, image: &Pixmap) -> SurfaceResult<()> {
        self.background.set_legacy(image)?;
        self.stroke = None;
        self.overlay.clear();
        self.history.reset(self.overlay.clone());
        log::info!("Opened saved drawing ({}x{}); overlay history reset", image.width(), image.height());
        Ok(())
    }

    /// Decode and open a previously-saved drawing (raw bytes or data URL).
    pub fn load_saved_drawing(&mut self, bytes: &[u8]) -> SurfaceResult<()> {
        let image = decode_image_source(bytes).inspect_err(|e| {
            log::warn!("Failed to decode saved drawing: {}", e);
        })?;
        self.set_saved_drawing(&image)
    }

    /// Feed a pointer event (display coordinates) through the state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        match event {
            PointerEvent::Down { position } => {
                if self.stroke.is_some() {
                    // Missed the matching up event; close the old stroke first
                    self.end_stroke();
                }
                if !self.tools.draws() {
                    return PointerOutcome::Ignored;
                }
                let start = self.mapping.to_canvas(position);
                self.stroke = Some(ActiveStroke::begin(self.tools.stroke_style(), start));
                PointerOutcome::StrokeStarted
            }
            PointerEvent::Move { position } => {
                let Some(stroke) = self.stroke.as_mut() else {
                    return PointerOutcome::Ignored;
                };
                let point = self.mapping.to_canvas(position);
                if stroke.extend_to(self.overlay.pixmap_mut(), point) {
                    PointerOutcome::SegmentDrawn
                } else {
                    PointerOutcome::Ignored
                }
            }
            PointerEvent::Up { .. } => {
                if self.stroke.is_none() {
                    return PointerOutcome::Ignored;
                }
                self.end_stroke()
            }
            PointerEvent::Leave => {
                if self.stroke.is_none() {
                    return PointerOutcome::Ignored;
                }
                match self.config.leave_policy {
                    LeavePolicy::Commit => self.end_stroke(),
                    LeavePolicy::Discard => self.discard_stroke(),
                }
            }
        }
    }

    /// End the active stroke and commit the overlay to history.
    fn end_stroke(&mut self) -> PointerOutcome {
        let Some(stroke) = self.stroke.take() else {
            return PointerOutcome::Ignored;
        };
        if self.history.commit(&self.overlay) {
            log::debug!("Stroke committed ({} segments)", stroke.segments());
            PointerOutcome::Committed
        } else {
            PointerOutcome::Unchanged
        }
    }

    /// Drop the active stroke, restoring the overlay from the current entry.
    fn discard_stroke(&mut self) -> PointerOutcome {
        let Some(stroke) = self.stroke.take() else {
            return PointerOutcome::Ignored;
        };
        self.overlay.restore_from(self.history.current());
        log::debug!("Stroke discarded ({} segments)", stroke.segments());
        PointerOutcome::Discarded
    }

    /// Set the active tool. A stroke in progress is ended first.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.end_stroke();
        self.tools.select_tool(tool);
    }

    /// Set the ink colour. Returns `false` if the colour is not in the palette.
    pub fn select_color(&mut self, color: InkColor) -> bool {
        self.tools.select_color(color)
    }

    /// Set the brush width. Returns `false` if the width is not offered.
    pub fn select_brush_width(&mut self, width: f32) -> bool {
        self.tools.select_brush_width(width)
    }

    /// Step back one history entry. No-op at the first entry.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        match self.history.undo() {
            Some(entry) => {
                self.overlay.restore_from(entry);
                log::debug!("Undo -> cursor {}", self.history.cursor());
                true
            }
            None => false,
        }
    }

    /// Step forward one history entry. No-op at the last entry.
    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        match self.history.redo() {
            Some(entry) => {
                self.overlay.restore_from(entry);
                log::debug!("Redo -> cursor {}", self.history.cursor());
                true
            }
            None => false,
        }
    }

    /// Erase the whole overlay and record the result in history.
    ///
    /// The background is untouched. Returns `false` if the overlay was
    /// already empty, in which case nothing is recorded.
    pub fn clear(&mut self) -> bool {
        self.end_stroke();
        self.overlay.clear();
        self.history.commit(&self.overlay)
    }

    /// Flatten the background and overlay at native resolution.
    pub fn composite(&self) -> Pixmap {
        let mut flattened = self.overlay.pixmap().clone();
        self.background.render_into(&mut flattened);
        flattened.draw_pixmap(
            0,
            0,
            self.overlay.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        flattened
    }

    /// Flatten and PNG-encode the drawing for the Drawing Store.
    ///
    /// Neither the overlay nor the history is modified, whether or not
    /// encoding succeeds.
    pub fn save(&self) -> Result<ExportedImage, ExportError> {
        let flattened = self.composite();
        match encode_png(&flattened) {
            Ok(image) => {
                log::info!(
                    "Saved body chart {}x{} ({} bytes)",
                    image.width,
                    image.height,
                    image.png.len()
                );
                Ok(image)
            }
            Err(e) => {
                log::error!("Failed to save body chart: {}", e);
                Err(e)
            }
        }
    }

    /// Update where the canvas is displayed on screen.
    pub fn set_displayed_rect(&mut self, displayed: Rect) {
        self.mapping.set_displayed(displayed);
    }

    pub fn mapping(&self) -> &DisplayMapping {
        &self.mapping
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.overlay.width()
    }

    pub fn height(&self) -> u32 {
        self.overlay.height()
    }

    pub fn overlay(&self) -> &Layer {
        &self.overlay
    }

    pub fn background_state(&self) -> &BackgroundState {
        self.background.state()
    }

    pub fn background_ready(&self) -> bool {
        self.background.is_ready()
    }

    pub fn phase(&self) -> PointerPhase {
        if self.stroke.is_some() {
            PointerPhase::Drawing
        } else {
            PointerPhase::Idle
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_cursor(&self) -> usize {
        self.history.cursor()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.tool()
    }

    pub fn color(&self) -> InkColor {
        self.tools.color()
    }

    pub fn brush_width(&self) -> f32 {
        self.tools.brush_width()
    }
}
