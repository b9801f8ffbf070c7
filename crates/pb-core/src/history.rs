//! Snapshot-based undo/redo history.
//!
//! The log is append-only with a cursor: entries past the cursor are a
//! discardable redo branch. Every entry is an independent deep copy of the
//! document — never a live reference — so restoring one can never alias
//! the store it replaces.

use crate::model::{Connection, Document, Node};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept; the oldest is evicted first (FIFO).
pub const HISTORY_CAP: usize = 100;

/// One committed `(nodes, connections)` state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Snapshot {
    pub fn of(doc: &Document) -> Self {
        Self {
            nodes: doc.nodes.clone(),
            connections: doc.connections.clone(),
        }
    }

    /// Rebuild a document from this entry (another deep copy — the entry
    /// itself stays immutable).
    pub fn to_document(&self) -> Document {
        Document {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
        }
    }
}

/// Append-only snapshot log with a cursor.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    /// Set while an undo/redo replacement is being applied to the live
    /// store; commits issued inside that window are suppressed so the
    /// replacement is never re-recorded.
    restoring: bool,
}

impl History {
    /// Start a history whose first entry is the loaded document.
    pub fn seeded(doc: &Document) -> Self {
        Self {
            entries: vec![Snapshot::of(doc)],
            cursor: 0,
            restoring: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Record the document as a new entry.
    ///
    /// No-op (returns `false`) while a restore is in progress, or when the
    /// document is structurally equal to the entry at the cursor.
    /// Otherwise the redo branch is discarded, a deep copy is appended,
    /// the cursor advances, and the oldest entry is evicted once the log
    /// exceeds [`HISTORY_CAP`].
    pub fn commit(&mut self, doc: &Document) -> bool {
        if self.restoring {
            log::debug!("history: commit suppressed during restore");
            return false;
        }
        let snapshot = Snapshot::of(doc);
        if let Some(current) = self.entries.get(self.cursor)
            && *current == snapshot
        {
            return false;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;

        if self.entries.len() > HISTORY_CAP {
            self.entries.remove(0);
            self.cursor -= 1;
        }
        true
    }

    /// Step the cursor back and return a deep copy of the target entry.
    /// `None` at the boundary.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Step the cursor forward and return a deep copy of the target entry.
    /// `None` at the boundary.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Run `apply` with the restore guard held. The closure replaces the
    /// live store; any commit it triggers is suppressed.
    pub fn with_restore_guard<R>(&mut self, apply: impl FnOnce(&mut Self) -> R) -> R {
        self.restoring = true;
        let result = apply(self);
        self.restoring = false;
        result
    }
}
