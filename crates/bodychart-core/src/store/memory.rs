//! In-memory drawing store.

use super::{BoxFuture, DrawingRecord, DrawingStore, StoreError, StoreResult};
use crate::export::ExportedImage;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for testing and ephemeral sessions.
#[derive(Default)]
pub struct MemoryDrawingStore {
    records: RwLock<HashMap<String, Vec<DrawingRecord>>>,
}

impl MemoryDrawingStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingStore for MemoryDrawingStore {
    fn append(&self, chart_entry_id: &str, image: &ExportedImage) -> BoxFuture<'_, StoreResult<DrawingRecord>> {
        let record = DrawingRecord::new(chart_entry_id, image);
        Box::pin(async move {
            let record = record?;
            let mut records = self.records.write().map_err(|e| {
                StoreError::Other(format!("Lock error: {}", e))
            })?;
            records
                .entry(record.chart_entry_id.clone())
                .or_default()
                .push(record.clone());
            log::debug!("Stored drawing {} for chart entry {}", record.id, record.chart_entry_id);
            Ok(record)
        })
    }

    fn list(&self, chart_entry_id: &str) -> BoxFuture<'_, StoreResult<Vec<DrawingRecord>>> {
        let chart_entry_id = chart_entry_id.to_string();
        Box::pin(async move {
            let records = self.records.read().map_err(|e| {
                StoreError::Other(format!("Lock error: {}", e))
            })?;
            Ok(records.get(&chart_entry_id).cloned().unwrap_or_default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    fn image(tag: u8) -> ExportedImage {
        ExportedImage {
            png: vec![tag; 4],
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn test_append_and_list() {
        let store = MemoryDrawingStore::new();
        block_on(store.append("entry-1", &image(1))).unwrap();
        block_on(store.append("entry-1", &image(2))).unwrap();
        block_on(store.append("entry-2", &image(3))).unwrap();

        let records = block_on(store.list("entry-1")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].image_bytes().unwrap(), vec![1; 4]);
        assert_eq!(records[1].image_bytes().unwrap(), vec![2; 4]);
    }

    #[test]
    fn test_latest() {
        let store = MemoryDrawingStore::new();
        assert!(block_on(store.latest("entry-1")).unwrap().is_none());

        block_on(store.append("entry-1", &image(1))).unwrap();
        let second = block_on(store.append("entry-1", &image(2))).unwrap();

        let latest = block_on(store.latest("entry-1")).unwrap().unwrap();
        assert_eq!(latest.id, second.id);
    }

    #[test]
    fn test_unknown_entry_is_empty() {
        let store = MemoryDrawingStore::new();
        assert!(block_on(store.list("nope")).unwrap().is_empty());
    }

    #[test]
    fn test_blank_entry_rejected() {
        let store = MemoryDrawingStore::new();
        let result = block_on(store.append("", &image(1)));
        assert!(matches!(result, Err(StoreError::InvalidChartEntry(_))));
    }
}
