//! Shared undo/redo log of full-canvas snapshots

use crate::config::MAX_HISTORY_ENTRIES;

/// What every participant's canvas should do after an undo or redo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEffect {
    /// Wipe the visible canvas; entries are kept for redo
    Clear,
    /// Paint this snapshot over the canvas
    Restore(String),
}

/// Indexed, truncatable snapshot log.
///
/// `cursor` is `None` when nothing is current (empty history, or every entry
/// has been undone). Otherwise it is always a valid index into `entries`.
/// At most `limit` entries are kept.
#[derive(Debug)]
pub struct DrawingHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
    limit: usize,
}

impl Default for DrawingHistory {
    fn default() -> Self {
        Self::with_limit(MAX_HISTORY_ENTRIES)
    }
}

impl DrawingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    /// Record a snapshot as the new current entry, discarding any redo branch.
    pub fn append(&mut self, snapshot: String) {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(next);
        self.entries.push(snapshot);

        if self.entries.len() > self.limit {
            // the cursor is on the tail here
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one entry. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<HistoryEffect> {
        let cursor = self.cursor?;
        if cursor == 0 {
            self.cursor = None;
            Some(HistoryEffect::Clear)
        } else {
            self.cursor = Some(cursor - 1);
            Some(HistoryEffect::Restore(self.entries[cursor - 1].clone()))
        }
    }

    /// Step forward one entry. Returns `None` when already at the tail.
    pub fn redo(&mut self) -> Option<HistoryEffect> {
        let next = self.cursor.map_or(0, |c| c + 1);
        let snapshot = self.entries.get(next)?.clone();
        self.cursor = Some(next);
        Some(HistoryEffect::Restore(snapshot))
    }

    /// Snapshot at the cursor, used to hydrate newcomers
    pub fn current(&self) -> Option<&str> {
        self.cursor.map(|c| self.entries[c].as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Cursor as a signed index, -1 meaning empty
    pub fn cursor(&self) -> isize {
        self.cursor.map_or(-1, |c| c as isize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
