//! Drawing Store: the append-only log of saved body chart drawings.
//!
//! The annotation surface never talks to a store; the surrounding
//! application hands the output of [`AnnotationSurface::save`] to one.
//!
//! [`AnnotationSurface::save`]: crate::surface::AnnotationSurface::save

mod file;
mod memory;

pub use file::FileDrawingStore;
pub use memory::MemoryDrawingStore;

use crate::export::{decode_data_url, ExportError, ExportedImage};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid chart entry id: {0:?}")]
    InvalidChartEntry(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// One saved drawing attached to a chart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawingRecord {
    pub id: Uuid,
    pub chart_entry_id: String,
    /// Flattened drawing as a `data:image/png;base64,...` URL.
    pub drawing_data: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

impl DrawingRecord {
    /// Build a new record for `image`, stamped with the current time.
    pub fn new(chart_entry_id: &str, image: &ExportedImage) -> StoreResult<Self> {
        if chart_entry_id.trim().is_empty() {
            return Err(StoreError::InvalidChartEntry(chart_entry_id.to_string()));
        }
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Ok(Self {
            id: Uuid::new_v4(),
            chart_entry_id: chart_entry_id.to_string(),
            drawing_data: image.to_data_url(),
            created_at,
        })
    }

    /// The encoded image bytes held by the record.
    pub fn image_bytes(&self) -> Result<Vec<u8>, ExportError> {
        decode_data_url(&self.drawing_data)
    }
}

/// Trait for drawing storage backends.
///
/// Records are append-only; each save adds a new record rather than
/// replacing the previous one.
pub trait DrawingStore: Send + Sync {
    /// Append a saved drawing to a chart entry's log.
    fn append(&self, chart_entry_id: &str, image: &ExportedImage) -> BoxFuture<'_, StoreResult<DrawingRecord>>;

    /// All drawings for a chart entry, oldest first.
    fn list(&self, chart_entry_id: &str) -> BoxFuture<'_, StoreResult<Vec<DrawingRecord>>>;

    /// The most recent drawing for a chart entry, if any.
    fn latest(&self, chart_entry_id: &str) -> BoxFuture<'_, StoreResult<Option<DrawingRecord>>> {
        let records = self.list(chart_entry_id);
        Box::pin(async move { Ok(records.await?.pop()) })
    }
}
