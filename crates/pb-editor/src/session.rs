//! The editing session: canonical store, selection, history, camera, and
//! the command surface (delete/duplicate/clipboard/undo/redo).
//!
//! Every user gesture commits all-or-nothing. A committed store mutation
//! is always followed, in the same synchronous turn, by a history commit
//! and then a best-effort, non-blocking save through the persistence
//! bridge; a bridge failure is logged and never rolls back memory.

use crate::bridge::{EditorRequest, EditorSettings, PersistenceBridge, SettingsStore};
use crate::debounce::TextDebounce;
use crate::interaction::Mode;
use crate::tools::{PLACE_GRAB_OFFSET, ToolKind};
use pb_core::camera::{Camera, Point};
use pb_core::history::History;
use pb_core::id::NodeId;
use pb_core::model::{Connection, Document, Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::sync::{LazyLock, Mutex};

/// Offset applied to pasted/duplicated nodes so they don't land exactly
/// on their source.
const PASTE_OFFSET: f32 = 24.0;

// ─── Selection ───────────────────────────────────────────────────────────

/// The set of selected node ids. The `primary` id is kept synchronized
/// whenever the set's size is exactly one; with several nodes selected it
/// names the node the gesture started on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<NodeId>,
    primary: Option<NodeId>,
}

impl Selection {
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn primary(&self) -> Option<NodeId> {
        self.primary
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn set(&mut self, ids: Vec<NodeId>) {
        self.ids = ids;
        self.sync_primary();
    }

    pub fn select_one(&mut self, id: NodeId) {
        self.ids = vec![id];
        self.sync_primary();
    }

    /// Shift-click semantics: flip membership.
    pub fn toggle(&mut self, id: NodeId) {
        if let Some(pos) = self.ids.iter().position(|i| *i == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
        self.sync_primary();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.primary = None;
    }

    /// Drop ids that no longer exist in the document (after delete or an
    /// undo/redo replacement).
    pub fn retain_existing(&mut self, doc: &Document) {
        self.ids.retain(|id| doc.contains(*id));
        self.sync_primary();
    }

    fn sync_primary(&mut self) {
        match self.ids.len() {
            0 => self.primary = None,
            1 => self.primary = Some(self.ids[0]),
            _ => {
                if !self.primary.is_some_and(|p| self.ids.contains(&p)) {
                    self.primary = Some(self.ids[0]);
                }
            }
        }
    }
}

// ─── Clipboard ───────────────────────────────────────────────────────────

/// Serialized clipboard value. Process-wide: it outlives a single canvas
/// session so content can cross between canvases.
static CLIPBOARD: LazyLock<Mutex<Option<String>>> = LazyLock::new(|| Mutex::new(None));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

pub fn clipboard_set(payload: &ClipboardPayload) {
    match serde_json::to_string(payload) {
        Ok(json) => {
            let mut slot = CLIPBOARD.lock().unwrap_or_else(|e| e.into_inner());
            *slot = Some(json);
        }
        Err(err) => log::warn!("clipboard serialization failed: {err}"),
    }
}

pub fn clipboard_get() -> Option<ClipboardPayload> {
    let slot = CLIPBOARD.lock().unwrap_or_else(|e| e.into_inner());
    slot.as_deref().and_then(|json| serde_json::from_str(json).ok())
}

// ─── Editor session ──────────────────────────────────────────────────────

/// One editing session over one canvas.
pub struct Editor {
    pub doc: Document,
    pub camera: Camera,
    pub selection: Selection,
    pub history: History,
    pub tool: ToolKind,
    pub mode: Mode,
    pub settings: EditorSettings,
    pub(crate) debounce: TextDebounce,
    bridge: Box<dyn PersistenceBridge>,
    settings_store: Box<dyn SettingsStore>,
}

impl Editor {
    /// Start a session: the bridge seeds the store and the first history
    /// entry, the settings store supplies preferences.
    pub fn new(
        mut bridge: Box<dyn PersistenceBridge>,
        mut settings_store: Box<dyn SettingsStore>,
    ) -> Self {
        let doc = match bridge.load() {
            Some((nodes, connections)) => Document { nodes, connections },
            None => Document::new(),
        };
        let history = History::seeded(&doc);
        let settings = settings_store.load();
        Self {
            doc,
            camera: Camera::default(),
            selection: Selection::default(),
            history,
            tool: ToolKind::Select,
            mode: Mode::Idle,
            settings,
            debounce: TextDebounce::default(),
            bridge,
            settings_store,
        }
    }

    pub(crate) fn grid(&self) -> Option<f32> {
        self.settings.grid_snap.then_some(self.settings.grid_size)
    }

    /// Record the current store state and notify the bridge. The bridge
    /// call is best-effort: a failure is logged, the in-memory edit stays
    /// authoritative.
    pub(crate) fn commit(&mut self) {
        if self.history.commit(&self.doc) {
            log::debug!(
                "commit: {} nodes, {} connections",
                self.doc.nodes.len(),
                self.doc.connections.len()
            );
            if let Err(err) = self.bridge.save(&self.doc.nodes, &self.doc.connections) {
                log::warn!("persistence save failed, keeping local state: {err}");
            }
        }
    }

    // ─── Undo / redo ─────────────────────────────────────────────────

    /// Replace the live store with the previous history entry as one
    /// indivisible step. No-op at the boundary.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.apply_snapshot(snapshot.to_document());
        }
    }

    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.apply_snapshot(snapshot.to_document());
        }
    }

    /// Atomic replacement of store + selection, inside the restore guard
    /// so the replacement itself is never recorded as a new commit.
    fn apply_snapshot(&mut self, doc: Document) {
        // A buffered text edit targets the store being replaced.
        self.debounce.cancel();
        let selection = &mut self.selection;
        let live = &mut self.doc;
        self.history.with_restore_guard(|_| {
            *live = doc;
            selection.retain_existing(live);
        });
        if let Err(err) = self.bridge.save(&self.doc.nodes, &self.doc.connections) {
            log::warn!("persistence save failed, keeping local state: {err}");
        }
    }

    // ─── Tool & cancellation surface ─────────────────────────────────

    /// Switch tools. Always cancels pending connect/drag-ready state;
    /// switching to a non-select/non-relationship tool also resets
    /// panning and marquee.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.tool {
            return;
        }
        self.cancel_pending();
        if !matches!(tool, ToolKind::Select | ToolKind::Relationship)
            && matches!(self.mode, Mode::Panning { .. } | Mode::BoxSelecting { .. })
        {
            self.mode = Mode::Idle;
        }
        self.tool = tool;
    }

    /// Escape: cancel pending connect/drag-ready state, clear the
    /// selection, return to the neutral tool. Never touches the store.
    pub fn escape(&mut self) {
        self.cancel_pending();
        self.selection.clear();
        self.tool = ToolKind::Select;
    }

    /// Drop armed-but-unpromoted gesture state with no side effects.
    fn cancel_pending(&mut self) {
        if matches!(
            self.mode,
            Mode::ConnectPending { .. } | Mode::DragPending { .. } | Mode::ResizePending { .. }
        ) {
            self.mode = Mode::Idle;
        }
    }

    // ─── Node creation ───────────────────────────────────────────────

    /// Place a node for the active creation tool at a screen point.
    /// Creation and selection land as one visible step, then commit.
    pub fn create_node_at(&mut self, screen: Point) -> Option<NodeId> {
        let kind = self.tool.creates()?;
        let canvas = self.camera.to_canvas(screen);
        let x = (canvas.x - PLACE_GRAB_OFFSET.x).max(0.0);
        let y = (canvas.y - PLACE_GRAB_OFFSET.y).max(0.0);

        let id = self
            .doc
            .add_node(Node::new(NodeId::fresh("node"), x, y, kind));
        self.selection.select_one(id);
        self.commit();
        Some(id)
    }

    // ─── Text editing ────────────────────────────────────────────────

    /// Commit debounced text content into a text-like node.
    pub fn set_node_text(&mut self, id: NodeId, content: &str) {
        let Some(node) = self.doc.node_mut(id) else {
            return;
        };
        match &mut node.kind {
            NodeKind::Text { content: c } | NodeKind::CompactText { content: c } => {
                *c = content.to_string();
            }
            _ => return,
        }
        self.commit();
    }

    // ─── Commands ────────────────────────────────────────────────────

    /// Delete every selected node. Connections to deleted nodes stay in
    /// the store as stale entries (undo can resurrect the endpoints).
    pub fn delete_selection(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        for id in self.selection.ids().to_vec() {
            self.doc.remove_node(id);
        }
        self.selection.clear();
        if self
            .debounce
            .pending_node()
            .is_some_and(|node| !self.doc.contains(node))
        {
            self.debounce.cancel();
        }
        self.commit();
    }

    pub fn copy_selection(&self) {
        if let Some(payload) = self.selection_payload() {
            clipboard_set(&payload);
        }
    }

    pub fn cut_selection(&mut self) {
        self.copy_selection();
        self.delete_selection();
    }

    /// Insert the clipboard contents with fresh ids, offset from the
    /// originals, and select the inserted nodes.
    pub fn paste(&mut self) {
        let Some(payload) = clipboard_get() else {
            return;
        };
        let inserted = self.insert_payload(payload);
        if inserted.is_empty() {
            return;
        }
        self.selection.set(inserted);
        self.commit();
    }

    /// Duplicate in place: copy semantics without touching the clipboard.
    pub fn duplicate_selection(&mut self) {
        let Some(payload) = self.selection_payload() else {
            return;
        };
        let inserted = self.insert_payload(payload);
        if inserted.is_empty() {
            return;
        }
        self.selection.set(inserted);
        self.commit();
    }

    /// Snapshot the selected nodes plus the connections fully inside the
    /// selection.
    fn selection_payload(&self) -> Option<ClipboardPayload> {
        if self.selection.is_empty() {
            return None;
        }
        let nodes: Vec<Node> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| self.doc.node(*id).cloned())
            .collect();
        if nodes.is_empty() {
            return None;
        }
        let ids: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
        let connections = self
            .doc
            .connections
            .iter()
            .filter(|c| ids.contains(&c.from) && ids.contains(&c.to))
            .copied()
            .collect();
        Some(ClipboardPayload { nodes, connections })
    }

    /// Materialize a payload with fresh ids; containment and connections
    /// are remapped when both sides are in the payload and dropped
    /// otherwise.
    fn insert_payload(&mut self, payload: ClipboardPayload) -> Vec<NodeId> {
        let remap: Vec<(NodeId, NodeId)> = payload
            .nodes
            .iter()
            .map(|n| (n.id, NodeId::fresh("node")))
            .collect();
        let mapped = |old: NodeId| remap.iter().find(|(o, _)| *o == old).map(|(_, n)| *n);

        let mut inserted = Vec::with_capacity(payload.nodes.len());
        for mut node in payload.nodes {
            node.id = mapped(node.id).unwrap_or(node.id);
            node.x += PASTE_OFFSET;
            node.y += PASTE_OFFSET;
            node.parent = node.parent.and_then(mapped);
            if let NodeKind::List { children, .. } = &mut node.kind {
                *children = children.iter().filter_map(|c| mapped(*c)).collect();
            }
            inserted.push(node.id);
            self.doc.add_node(node);
        }
        for conn in payload.connections {
            if let (Some(from), Some(to)) = (mapped(conn.from), mapped(conn.to)) {
                self.doc.connections.push(Connection {
                    id: NodeId::fresh("conn"),
                    from,
                    to,
                    kind: conn.kind,
                });
            }
        }
        inserted
    }

    // ─── Linked sub-canvases ─────────────────────────────────────────

    /// Request navigation into a node's linked sub-canvas, allocating a
    /// fresh canvas id the first time. Nested content is not stored here.
    pub fn open_linked_canvas(&mut self, id: NodeId) -> Option<EditorRequest> {
        let node = self.doc.node_mut(id)?;
        let (canvas_slot, label) = match &mut node.kind {
            NodeKind::Character { name, canvas } => (canvas, name.clone()),
            NodeKind::Folder { label, canvas } => (canvas, label.clone()),
            NodeKind::RelationshipMap { canvas } => (canvas, String::from("Relationships")),
            _ => return None,
        };
        let allocated = canvas_slot.is_none();
        let canvas = *canvas_slot.get_or_insert_with(|| NodeId::fresh("canvas"));
        if allocated {
            // Allocating the id is a structural change worth persisting.
            self.commit();
        }
        Some(EditorRequest::NavigateToCanvas { canvas, label })
    }

    // ─── Settings ────────────────────────────────────────────────────

    /// Save-on-change lifecycle for the injected settings store.
    pub fn update_settings(&mut self, settings: EditorSettings) {
        self.settings = settings;
        self.settings_store.save(&settings);
    }
}
