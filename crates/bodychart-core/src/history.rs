//! Linear undo/redo history of overlay snapshots.

use crate::layer::Layer;
use serde::{Deserialize, Serialize};

/// Default number of snapshots to keep.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// How many snapshots the history may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryLimit {
    /// Keep every snapshot for the lifetime of the surface.
    Unbounded,
    /// Keep at most this many snapshots, evicting the oldest first.
    Depth(usize),
}

impl Default for HistoryLimit {
    fn default() -> Self {
        HistoryLimit::Depth(DEFAULT_HISTORY_DEPTH)
    }
}

/// Ordered overlay snapshots with a cursor pointing at the displayed one.
///
/// The history is never empty and the cursor always indexes an entry.
/// Committing after an undo discards every entry past the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Layer>,
    cursor: usize,
    limit: HistoryLimit,
}

impl History {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: Layer, limit: HistoryLimit) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            limit,
        }
    }

    /// Drop every entry and start again from `initial`.
    pub fn reset(&mut self, initial: Layer) {
        self.entries.clear();
        self.entries.push(initial);
        self.cursor = 0;
    }

    /// Record a snapshot of `overlay`.
    ///
    /// Returns `false` without touching the history when the overlay is
    /// pixel-identical to the entry at the cursor.
    pub fn commit(&mut self, overlay: &Layer) -> bool {
        if self.current().same_pixels(overlay) {
            log::debug!("History commit skipped: overlay unchanged");
            return false;
        }

        // A new edit after an undo erases the redo branch
        self.entries.truncate(self.cursor + 1);
        self.entries.push(overlay.clone());
        self.cursor = self.entries.len() - 1;

        if let HistoryLimit::Depth(depth) = self.limit {
            let depth = depth.max(1);
            if self.entries.len() > depth {
                let excess = self.entries.len() - depth;
                self.entries.drain(..excess);
                self.cursor -= excess;
            }
        }

        log::debug!("History commit: {} entries, cursor {}", self.entries.len(), self.cursor);
        true
    }

    /// Step back one entry. Returns the entry to restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<&Layer> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Step forward one entry. Returns the entry to restore, or `None` at the end.
    pub fn redo(&mut self) -> Option<&Layer> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// The entry at the cursor.
    pub fn current(&self) -> &Layer {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history has no entries (never true).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn limit(&self) -> HistoryLimit {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_skia::Color;

    fn layer_with_pixel(x: u32, y: u32) -> Layer {
        let mut layer = Layer::new(8, 8).unwrap();
        layer.fill_pixel(x, y, Color::BLACK);
        layer
    }

    #[test]
    fn test_new_history() {
        let history = History::new(Layer::new(8, 8).unwrap(), HistoryLimit::Unbounded);
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_commit_advances_cursor() {
        let mut history = History::new(Layer::new(8, 8).unwrap(), HistoryLimit::Unbounded);
        for i in 0..3 {
            assert!(history.commit(&layer_with_pixel(i, 0)));
        }
        assert_eq!(history.len(), 4);
        assert_eq!(history.cursor(), 3);
    }

    #[test]
    fn test_identical_commit_skipped() {
        let mut history = History::new(Layer::new(8, 8).unwrap(), HistoryLimit::Unbounded);
        assert!(!history.commit(&Layer::new(8, 8).unwrap()));
        assert_eq!(history.len(), 1);

        let layer = layer_with_pixel(1, 1);
        assert!(history.commit(&layer));
        assert!(!history.commit(&layer));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_undo_redo_boundaries() {
        let mut history = History::new(Layer::new(8, 8).unwrap(), HistoryLimit::Unbounded);
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());

        history.commit(&layer_with_pixel(0, 0));
        assert!(history.undo().is_some());
        assert_eq!(history.cursor(), 0);
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), 0);

        assert!(history.redo().is_some());
        assert_eq!(history.cursor(), 1);
        assert!(history.redo().is_none());
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_commit_discards_redo_branch() {
        let mut history = History::new(Layer::new(8, 8).unwrap(), HistoryLimit::Unbounded);
        history.commit(&layer_with_pixel(0, 0));
        history.commit(&layer_with_pixel(1, 0));
        history.commit(&layer_with_pixel(2, 0));

        history.undo();
        assert!(history.can_redo());

        history.commit(&layer_with_pixel(3, 3));
        assert_eq!(history.len(), 4);
        assert_eq!(history.cursor(), 3);
        assert!(!history.can_redo());
        assert!(history.current().same_pixels(&layer_with_pixel(3, 3)));
    }

    #[test]
    fn test_depth_limit_evicts_oldest() {
        let mut history = History::new(Layer::new(8, 8).unwrap(), HistoryLimit::Depth(3));
        for i in 0..5 {
            history.commit(&layer_with_pixel(i, 0));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert!(history.current().same_pixels(&layer_with_pixel(4, 0)));

        // Oldest surviving entry is the third commit
        history.undo();
        let oldest = history.undo().unwrap().clone();
        assert!(oldest.same_pixels(&layer_with_pixel(2, 0)));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_reset() {
        let mut history = History::new(Layer::new(8, 8).unwrap(), HistoryLimit::Unbounded);
        history.commit(&layer_with_pixel(0, 0));
        history.reset(Layer::new(8, 8).unwrap());
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), 0);
    }
}
