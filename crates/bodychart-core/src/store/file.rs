//! File-based drawing store.

use super::{BoxFuture, DrawingRecord, DrawingStore, StoreError, StoreResult};
use crate::export::ExportedImage;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File-based drawing store.
///
/// Each chart entry gets one JSON-lines log file; every save appends a line.
pub struct FileDrawingStore {
    /// Base directory for drawing logs.
    base_path: PathBuf,
}

impl FileDrawingStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StoreError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a store in the default location.
    ///
    /// On Unix: `~/.local/share/bodychart/drawings/`
    /// On Windows: `%LOCALAPPDATA%\bodychart\drawings\`
    pub fn default_location() -> StoreResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("bodychart").join("drawings"))
    }

    /// Log file path for a chart entry.
    fn log_path(&self, chart_entry_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", encode_file_stem(chart_entry_id)))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Encode a chart entry id as a file stem.
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `_xx`
/// (lowercase hex), so distinct ids never share a file.
fn encode_file_stem(chart_entry_id: &str) -> String {
    let mut stem = String::with_capacity(chart_entry_id.len());
    for byte in chart_entry_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

/// Read every record in `path` that belongs to `chart_entry_id`.
fn read_log(path: &Path, chart_entry_id: &str) -> StoreResult<Vec<DrawingRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        StoreError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let mut records = Vec::new();
    for line in contents.lines().filter(|line| !line.trim().is_empty()) {
        let record: DrawingRecord = serde_json::from_str(line).map_err(|e| {
            StoreError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        if record.chart_entry_id == chart_entry_id {
            records.push(record);
        } else {
            log::warn!(
                "Skipping drawing {} for chart entry {:?} found in {}",
                record.id,
                record.chart_entry_id,
                path.display()
            );
        }
    }
    Ok(records)
}

impl DrawingStore for FileDrawingStore {
    fn append(&self, chart_entry_id: &str, image: &ExportedImage) -> BoxFuture<'_, StoreResult<DrawingRecord>> {
        let path = self.log_path(chart_entry_id);
        let record = DrawingRecord::new(chart_entry_id, image);

        Box::pin(async move {
            let record = record?;
            let mut line = serde_json::to_string(&record)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            line.push('\n');

            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| StoreError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
            file.write_all(line.as_bytes())
                .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

            log::info!("Appended drawing {} to {}", record.id, path.display());
            Ok(record)
        })
    }

    fn list(&self, chart_entry_id: &str) -> BoxFuture<'_, StoreResult<Vec<DrawingRecord>>> {
        let path = self.log_path(chart_entry_id);
        let chart_entry_id = chart_entry_id.to_string();
        Box::pin(async move { read_log(&path, &chart_entry_id) })
    }
}
