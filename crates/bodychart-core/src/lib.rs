//! Body Chart Core Library
//!
//! A two-layer raster annotation surface: an immutable reference background,
//! a mutable ink overlay, freehand strokes, and a linear undo/redo history of
//! overlay snapshots. Saving flattens both layers into a single PNG.

pub mod color;
pub mod config;
pub mod export;
pub mod history;
pub mod input;
pub mod layer;
pub mod store;
pub mod stroke;
pub mod surface;
pub mod tools;
pub mod viewport;

pub use color::{ColorError, InkColor, DEFAULT_BRUSH_WIDTHS, DEFAULT_PALETTE};
pub use config::{ConfigError, LeavePolicy, SurfaceConfig};
pub use export::{ExportError, ExportedImage};
pub use history::{History, HistoryLimit};
pub use input::{PointerEvent, PointerPhase};
pub use layer::{Background, BackgroundState, Layer};
pub use store::{DrawingRecord, DrawingStore, FileDrawingStore, MemoryDrawingStore, StoreError};
pub use stroke::{ActiveStroke, StrokeStyle};
pub use surface::{AnnotationSurface, PointerOutcome, SurfaceError};
pub use tools::{ToolKind, ToolSettings};
pub use viewport::DisplayMapping;
