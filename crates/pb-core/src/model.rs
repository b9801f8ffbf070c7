//! Canonical node/connection store for a PlotBoard canvas.
//!
//! Nodes are flat: containment is expressed with a `parent` back-pointer on
//! the child and an ordered child list carried *inside* the `List` payload.
//! Only lists own children, so the single-level-nesting invariant holds by
//! construction — there is no way to express a list inside a list's child
//! slot, and `layout::attach_child` refuses nodes that already have a
//! parent.
//!
//! Connections are permissive: an endpoint referencing a deleted node is
//! kept as-is and skipped at traversal time (`live_connections`). Deletions
//! and undo/redo legitimately produce such transients.

use crate::camera::{Point, Rect};
use crate::id::NodeId;
use crate::layout;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Node kinds ──────────────────────────────────────────────────────────

/// The node kinds placeable on a canvas, each with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Free-form rich text block.
    Text { content: String },

    /// Single-line text; height derives from content, only width resizes.
    CompactText { content: String },

    /// A character card. `canvas` links to the character's own sub-canvas.
    Character { name: String, canvas: Option<NodeId> },

    /// A story event / scene card.
    Event { title: String },

    /// A location card.
    Location { name: String },

    /// A folder grouping arbitrary material behind a linked sub-canvas.
    Folder { label: String, canvas: Option<NodeId> },

    /// Ordered container. The only kind that owns children.
    List {
        title: String,
        children: SmallVec<[NodeId; 8]>,
    },

    /// An image reference. Natural size fixes the aspect ratio on resize.
    Image {
        source: String,
        natural_width: f32,
        natural_height: f32,
    },

    /// A table. Column widths are percentages of total width, summing to 100.
    Table {
        columns: SmallVec<[f32; 4]>,
        rows: u32,
    },

    /// An embedded relationship map behind a linked sub-canvas.
    RelationshipMap { canvas: Option<NodeId> },

    /// A polyline with three control points, relative to the node origin.
    Line { points: [Point; 3] },
}

impl NodeKind {
    /// Minimum size for this kind. Resize and creation clamp against this.
    pub fn min_size(&self) -> (f32, f32) {
        match self {
            NodeKind::Event { .. } => (220.0, 280.0),
            NodeKind::Character { .. } | NodeKind::Location { .. } => (320.0, 72.0),
            NodeKind::Image { .. } => (200.0, 200.0),
            NodeKind::Table { columns, .. } => ((60.0 * columns.len() as f32).max(150.0), 60.0),
            NodeKind::List { children, .. } => layout::list_min_size(children.len()),
            NodeKind::CompactText { .. } => (160.0, 36.0),
            _ => (120.0, 80.0),
        }
    }

    /// Size a node of this kind gets when placed by a creation tool.
    pub fn default_size(&self) -> (f32, f32) {
        match self {
            NodeKind::Text { .. } => (300.0, 139.0),
            NodeKind::CompactText { .. } => (220.0, 44.0),
            NodeKind::Character { .. } | NodeKind::Location { .. } => (320.0, 72.0),
            NodeKind::Event { .. } => (220.0, 280.0),
            NodeKind::Folder { .. } => (160.0, 120.0),
            NodeKind::List { .. } => layout::list_min_size(0),
            NodeKind::Image { .. } => (200.0, 200.0),
            NodeKind::Table { .. } => (300.0, 160.0),
            NodeKind::RelationshipMap { .. } => (240.0, 160.0),
            NodeKind::Line { .. } => (200.0, 100.0),
        }
    }

    /// Whether nodes of this kind may be dropped into a list container.
    pub fn containable(&self) -> bool {
        matches!(
            self,
            NodeKind::Folder { .. }
                | NodeKind::Character { .. }
                | NodeKind::Location { .. }
                | NodeKind::Event { .. }
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::List { .. })
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A single canvas entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub z_index: i32,
    /// The list container this node sits in, if any. Invariant: when set,
    /// the node's id appears in that list's children exactly once.
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    /// Create a node at `(x, y)` with the kind's default size.
    pub fn new(id: NodeId, x: f32, y: f32, kind: NodeKind) -> Self {
        let (width, height) = kind.default_size();
        Self {
            id,
            x,
            y,
            width,
            height,
            z_index: 0,
            parent: None,
            kind,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The line control points in canvas space, for line-kind nodes.
    pub fn line_points(&self) -> Option<[Point; 3]> {
        match &self.kind {
            NodeKind::Line { points } => Some(points.map(|p| Point::new(self.x + p.x, self.y + p.y))),
            _ => None,
        }
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionKind {
    /// Narrative ordering between event cards.
    Sequence,
    /// A relationship edge on a relationship map.
    Relationship,
}

/// A directed link between two node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: NodeId,
    pub from: NodeId,
    pub to: NodeId,
    pub kind: ConnectionKind,
}

// ─── Document ────────────────────────────────────────────────────────────

/// The complete canvas state: every node plus every connection.
///
/// Owned by the editing session; history snapshots are independent deep
/// copies of this value, never live references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Next free z-index (above every existing node).
    pub fn next_z(&self) -> i32 {
        self.nodes.iter().map(|n| n.z_index).max().unwrap_or(0) + 1
    }

    /// Add a node on top of everything else.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        node.z_index = self.next_z();
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Remove a node. A removed list releases its children back to the free
    /// canvas; a removed child is detached from its container first.
    /// Connections are deliberately left alone — stale endpoints are
    /// tolerated and skipped at traversal time.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        if let Some(parent_id) = self.node(id).and_then(|n| n.parent) {
            layout::detach_child(self, parent_id, id);
        }

        let pos = self.nodes.iter().position(|n| n.id == id)?;
        let removed = self.nodes.remove(pos);

        if let NodeKind::List { children, .. } = &removed.kind {
            for child_id in children.clone() {
                if let Some(child) = self.node_mut(child_id) {
                    child.parent = None;
                }
            }
        }
        Some(removed)
    }

    pub fn bring_to_front(&mut self, id: NodeId) {
        let top = self.next_z();
        if let Some(node) = self.node_mut(id) {
            node.z_index = top;
        }
    }

    /// Ordered children of a list node. Empty for every other kind.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::List { children, .. }) => children,
            _ => &[],
        }
    }

    // ─── Connections ─────────────────────────────────────────────────

    /// Connections whose endpoints both still exist. Stale entries are
    /// skipped, not removed.
    pub fn live_connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections
            .iter()
            .filter(|c| self.contains(c.from) && self.contains(c.to))
    }

    /// Find a connection between two nodes of the given kind, in either
    /// direction.
    pub fn connection_between(
        &self,
        a: NodeId,
        b: NodeId,
        kind: ConnectionKind,
    ) -> Option<NodeId> {
        self.connections
            .iter()
            .find(|c| c.kind == kind && ((c.from == a && c.to == b) || (c.from == b && c.to == a)))
            .map(|c| c.id)
    }

    /// Toggle a connection: create it if absent, delete it if present.
    /// Returns `true` when a connection was created.
    pub fn toggle_connection(&mut self, from: NodeId, to: NodeId, kind: ConnectionKind) -> bool {
        if let Some(existing) = self.connection_between(from, to, kind) {
            self.connections.retain(|c| c.id != existing);
            false
        } else {
            self.connections.push(Connection {
                id: NodeId::fresh("conn"),
                from,
                to,
                kind,
            });
            true
        }
    }

    // ─── Hit testing ─────────────────────────────────────────────────

    /// The topmost node whose bounds contain the canvas point.
    pub fn topmost_at(&self, p: Point) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.bounds().contains(p))
            .max_by_key(|n| n.z_index)
            .map(|n| n.id)
    }

    /// All nodes hit by a marquee rectangle. Most kinds are tested by
    /// bounding-box intersection; line nodes by their three control points.
    pub fn intersecting(&self, rect: &Rect) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| match n.line_points() {
                Some(points) => points.iter().any(|p| rect.contains(*p)),
                None => n.bounds().intersects(rect),
            })
            .map(|n| n.id)
            .collect()
    }
}
