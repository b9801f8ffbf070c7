//! External collaborator seams: persistence, navigation, settings.
//!
//! The core never performs I/O itself. Persistence is optimistic and
//! local-first: `save` is fire-and-forget after every committed mutation,
//! a failure is logged and never rolls back in-memory state. Navigation
//! into a node's linked sub-canvas is requested, not performed — the
//! embedder owns routing and nested-canvas content.

use pb_core::id::NodeId;
use pb_core::model::{Connection, Node};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Save/load seam for the hosting application.
pub trait PersistenceBridge {
    /// Persist the committed document. Called after every committed
    /// structural mutation; the caller ignores the result beyond logging.
    fn save(&mut self, nodes: &[Node], connections: &[Connection]) -> Result<(), String>;

    /// Seed the store at session start. `None` starts an empty canvas.
    fn load(&mut self) -> Option<(Vec<Node>, Vec<Connection>)>;
}

/// Requests the engine hands back to its embedder. Emitting one has no
/// effect on the store; the embedder decides whether and when to act.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorRequest {
    /// Open a node's linked sub-canvas.
    NavigateToCanvas { canvas: NodeId, label: String },
    /// Ask the user to confirm moving `node` into `target`'s nested canvas.
    ConfirmNestInto { node: NodeId, target: NodeId },
}

// ─── Settings ────────────────────────────────────────────────────────────

/// Process-wide editor preferences, loaded at session start and saved on
/// every change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    pub grid_snap: bool,
    pub grid_size: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_snap: false,
            grid_size: 20.0,
        }
    }
}

/// Injected configuration store — explicit get/set, no ambient globals.
pub trait SettingsStore {
    fn load(&mut self) -> EditorSettings;
    fn save(&mut self, settings: &EditorSettings);
}

// ─── In-memory implementations ───────────────────────────────────────────

/// In-memory bridge, used by tests and as a default for embedders that
/// wire persistence up later.
#[derive(Debug, Default)]
pub struct MemoryBridge {
    pub stored: Option<(Vec<Node>, Vec<Connection>)>,
    /// Shared save counter, observable after the bridge is boxed.
    pub save_count: Arc<AtomicUsize>,
    /// When set, every save fails — for exercising the local-first path.
    pub fail_saves: bool,
}

impl PersistenceBridge for MemoryBridge {
    fn save(&mut self, nodes: &[Node], connections: &[Connection]) -> Result<(), String> {
        self.save_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_saves {
            return Err("storage unavailable".into());
        }
        self.stored = Some((nodes.to_vec(), connections.to_vec()));
        Ok(())
    }

    fn load(&mut self) -> Option<(Vec<Node>, Vec<Connection>)> {
        self.stored.clone()
    }
}

#[derive(Debug, Default)]
pub struct MemorySettings {
    pub settings: EditorSettings,
}

impl SettingsStore for MemorySettings {
    fn load(&mut self) -> EditorSettings {
        self.settings
    }

    fn save(&mut self, settings: &EditorSettings) {
        self.settings = *settings;
    }
}
