//! The pointer-driven interaction machine.
//!
//! All gesture state lives in a single `Mode` value on the session; every
//! pointer event either stays in the current mode, promotes a pending
//! gesture, or ends one. Geometry mutates live during a gesture and is
//! committed exactly once at release, so each completed gesture is one
//! undo step.

use crate::bridge::EditorRequest;
use crate::input::{InputEvent, PointerButton};
use crate::session::Editor;
use pb_core::camera::{Point, Rect};
use pb_core::id::NodeId;
use pb_core::model::NodeKind;
use pb_core::{layout, resize};

/// Screen-space distance a pressed pointer must travel before a pending
/// click becomes a drag. Below this, release is a plain click.
pub const DRAG_THRESHOLD: f32 = 3.0;

// ─── Hits & modes ────────────────────────────────────────────────────────

/// What the pointer landed on. Node bodies come from document hit testing;
/// handles and boundaries are view geometry the embedder resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Empty,
    Node(NodeId),
    ResizeHandle(NodeId),
    ColumnBoundary { table: NodeId, boundary: usize },
    LineVertex { line: NodeId, vertex: usize },
}

/// Captured start state of an in-flight node drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// The node the gesture started on.
    pub node: NodeId,
    /// Canvas-space pointer position at press.
    pub grab: Point,
    /// Start position of every moving node, list children included.
    pub origins: Vec<(NodeId, Point)>,
}

/// The interaction mode. `*Pending` modes hold a pressed pointer that has
/// not yet crossed [`DRAG_THRESHOLD`]; `ConnectPending` is the only mode
/// that survives pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    BoxSelecting {
        anchor: Point,
        current: Point,
        /// Selection to extend (shift-marquee); empty otherwise.
        base: Vec<NodeId>,
    },
    DragPending {
        node: NodeId,
        press: Point,
    },
    Dragging(DragState),
    ResizePending {
        node: NodeId,
        press: Point,
    },
    Resizing {
        node: NodeId,
        start_pointer: Point,
        start_width: f32,
        start_height: f32,
    },
    ConnectPending {
        from: NodeId,
    },
    ColumnResizing {
        table: NodeId,
        boundary: usize,
        /// Canvas x of the previous sample; deltas are incremental.
        last_x: f32,
    },
    LineVertexDragging {
        line: NodeId,
        vertex: usize,
    },
}

fn distance(a: Point, b: Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

// ─── Pointer handlers ────────────────────────────────────────────────────

impl Editor {
    /// Body-only hit test against the document. Embedders with handle
    /// chrome resolve their own [`Hit`] and pass it to [`Editor::pointer_down`].
    pub fn hit_test(&self, screen: Point) -> Hit {
        let canvas = self.camera.to_canvas(screen);
        match self.doc.topmost_at(canvas) {
            Some(id) => Hit::Node(id),
            None => Hit::Empty,
        }
    }

    /// Begin a gesture. `text_editing` suppresses drag arming so pointer
    /// movement inside an active text editor selects text instead of
    /// moving the node.
    pub fn pointer_down(&mut self, ev: &InputEvent, hit: Hit, text_editing: bool) {
        let InputEvent::PointerDown {
            button, modifiers, ..
        } = *ev
        else {
            return;
        };
        let screen = ev.position();
        let canvas = self.camera.to_canvas(screen);

        // Middle button pans regardless of the active tool; so does the
        // secondary button over empty canvas.
        if button == PointerButton::Middle
            || (button == PointerButton::Secondary && hit == Hit::Empty)
        {
            self.mode = Mode::Panning { last: screen };
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        if let Some(kind) = self.tool.connects() {
            match hit {
                Hit::Node(id) | Hit::ResizeHandle(id) => match self.mode {
                    Mode::ConnectPending { from } if from != id => {
                        self.doc.toggle_connection(from, id, kind);
                        self.commit();
                        self.mode = Mode::Idle;
                    }
                    // Clicking the armed endpoint again cancels.
                    Mode::ConnectPending { .. } => self.mode = Mode::Idle,
                    _ => self.mode = Mode::ConnectPending { from: id },
                },
                _ => self.mode = Mode::Idle,
            }
            return;
        }

        if self.tool.creates().is_some() {
            match hit {
                Hit::Empty => {
                    self.create_node_at(screen);
                }
                Hit::Node(id) | Hit::ResizeHandle(id) => self.selection.select_one(id),
                _ => {}
            }
            return;
        }

        match hit {
            Hit::Empty => {
                let base = if modifiers.shift {
                    self.selection.ids().to_vec()
                } else {
                    self.selection.clear();
                    Vec::new()
                };
                self.mode = Mode::BoxSelecting {
                    anchor: canvas,
                    current: canvas,
                    base,
                };
            }
            Hit::Node(id) => {
                if modifiers.shift {
                    self.selection.toggle(id);
                } else if !self.selection.contains(id) {
                    self.selection.select_one(id);
                }
                // Shift-toggle may have deselected the node; only a
                // selected node arms a drag.
                if self.selection.contains(id) && !text_editing {
                    self.mode = Mode::DragPending {
                        node: id,
                        press: screen,
                    };
                }
            }
            Hit::ResizeHandle(id) => {
                if !self.selection.contains(id) {
                    self.selection.select_one(id);
                }
                self.mode = Mode::ResizePending {
                    node: id,
                    press: screen,
                };
            }
            // Fine-grained handles drag without a promotion threshold.
            Hit::ColumnBoundary { table, boundary } => {
                self.mode = Mode::ColumnResizing {
                    table,
                    boundary,
                    last_x: canvas.x,
                };
            }
            Hit::LineVertex { line, vertex } => {
                self.mode = Mode::LineVertexDragging { line, vertex };
            }
        }
    }

    pub fn pointer_move(&mut self, ev: &InputEvent) {
        let screen = ev.position();
        let canvas = self.camera.to_canvas(screen);

        match self.mode.clone() {
            Mode::Panning { last } => {
                self.camera.pan_by(screen.x - last.x, screen.y - last.y);
                self.mode = Mode::Panning { last: screen };
            }
            Mode::BoxSelecting { anchor, base, .. } => {
                let rect = Rect::from_corners(anchor, canvas);
                let mut ids = base.clone();
                for id in self.doc.intersecting(&rect) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                self.selection.set(ids);
                self.mode = Mode::BoxSelecting {
                    anchor,
                    current: canvas,
                    base,
                };
            }
            Mode::DragPending { node, press } => {
                if distance(screen, press) > DRAG_THRESHOLD {
                    let drag = self.begin_drag(node, press);
                    self.apply_drag(&drag, canvas);
                    self.mode = Mode::Dragging(drag);
                }
            }
            Mode::Dragging(drag) => {
                self.apply_drag(&drag, canvas);
            }
            Mode::ResizePending { node, press } => {
                if distance(screen, press) > DRAG_THRESHOLD {
                    let Some(n) = self.doc.node(node) else {
                        self.mode = Mode::Idle;
                        return;
                    };
                    let mode = Mode::Resizing {
                        node,
                        start_pointer: self.camera.to_canvas(press),
                        start_width: n.width,
                        start_height: n.height,
                    };
                    self.mode = mode.clone();
                    self.apply_resize_mode(&mode, canvas);
                }
            }
            mode @ Mode::Resizing { .. } => {
                self.apply_resize_mode(&mode, canvas);
            }
            Mode::ColumnResizing {
                table,
                boundary,
                last_x,
            } => {
                let delta = canvas.x - last_x;
                if let Some(node) = self.doc.node_mut(table) {
                    let width = node.width;
                    if let NodeKind::Table { columns, .. } = &mut node.kind {
                        resize::transfer_column_width(columns, boundary, delta, width);
                    }
                }
                self.mode = Mode::ColumnResizing {
                    table,
                    boundary,
                    last_x: canvas.x,
                };
            }
            Mode::LineVertexDragging { line, vertex } => {
                if let Some(node) = self.doc.node_mut(line) {
                    let rel = Point::new(canvas.x - node.x, canvas.y - node.y);
                    if let NodeKind::Line { points } = &mut node.kind
                        && vertex < points.len()
                    {
                        points[vertex] = rel;
                    }
                }
            }
            Mode::Idle | Mode::ConnectPending { .. } => {}
        }
    }

    pub fn pointer_up(&mut self, ev: &InputEvent) -> Vec<EditorRequest> {
        self.end_gesture(ev.position())
    }

    /// The pointer left the window or was captured elsewhere. Treated like
    /// a release at the last known position.
    pub fn pointer_cancel(&mut self, ev: &InputEvent) -> Vec<EditorRequest> {
        self.end_gesture(ev.position())
    }

    fn end_gesture(&mut self, screen: Point) -> Vec<EditorRequest> {
        let canvas = self.camera.to_canvas(screen);
        match std::mem::take(&mut self.mode) {
            // An armed connect waits for the second click.
            Mode::ConnectPending { from } => {
                self.mode = Mode::ConnectPending { from };
                Vec::new()
            }
            Mode::Dragging(drag) => self.finish_drag(drag),
            Mode::BoxSelecting { anchor, base, .. } => {
                let rect = Rect::from_corners(anchor, canvas);
                let mut ids = base;
                for id in self.doc.intersecting(&rect) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                self.selection.set(ids);
                Vec::new()
            }
            Mode::Resizing { .. } | Mode::ColumnResizing { .. } | Mode::LineVertexDragging { .. } => {
                self.commit();
                Vec::new()
            }
            // A sub-threshold press was a plain click.
            Mode::Idle
            | Mode::Panning { .. }
            | Mode::DragPending { .. }
            | Mode::ResizePending { .. } => Vec::new(),
        }
    }

    // ─── Drag mechanics ──────────────────────────────────────────────

    /// Capture start positions for the whole moving set: every selected
    /// node plus the children of any selected list container.
    fn begin_drag(&mut self, node: NodeId, press: Point) -> DragState {
        let grab = self.camera.to_canvas(press);
        let mut origins: Vec<(NodeId, Point)> = Vec::new();
        for id in self.selection.ids() {
            if let Some(n) = self.doc.node(*id) {
                origins.push((*id, Point::new(n.x, n.y)));
                for child_id in self.doc.children_of(*id) {
                    if !self.selection.contains(*child_id)
                        && let Some(child) = self.doc.node(*child_id)
                    {
                        origins.push((*child_id, Point::new(child.x, child.y)));
                    }
                }
            }
        }
        DragState {
            node,
            grab,
            origins,
        }
    }

    /// Apply the pointer delta uniformly. The delta is clamped per axis so
    /// no moving node would land at a negative coordinate, preserving the
    /// set's relative layout.
    fn apply_drag(&mut self, drag: &DragState, canvas: Point) {
        let min_x = drag
            .origins
            .iter()
            .map(|(_, p)| p.x)
            .fold(f32::INFINITY, f32::min);
        let min_y = drag
            .origins
            .iter()
            .map(|(_, p)| p.y)
            .fold(f32::INFINITY, f32::min);

        let dx = (canvas.x - drag.grab.x).max(-min_x);
        let dy = (canvas.y - drag.grab.y).max(-min_y);

        for (id, origin) in &drag.origins {
            if let Some(node) = self.doc.node_mut(*id) {
                node.x = origin.x + dx;
                node.y = origin.y + dy;
            }
        }
    }

    /// Resolve the drop and commit the gesture.
    ///
    /// In order: a child still overlapping its container snaps back into
    /// the stack (or detaches if dragged clear); a free containable node
    /// overlapping a list is adopted by it; any free node overlapping a
    /// folder or character card asks the embedder to confirm nesting; any
    /// other drop is a plain position commit.
    fn finish_drag(&mut self, drag: DragState) -> Vec<EditorRequest> {
        let mut requests = Vec::new();
        self.doc.bring_to_front(drag.node);

        if let Some(node) = self.doc.node(drag.node) {
            let bounds = node.bounds();
            let parent = node.parent;
            let containable = node.kind.containable();

            if let Some(parent_id) = parent {
                let still_inside = self
                    .doc
                    .node(parent_id)
                    .is_some_and(|p| p.bounds().intersects(&bounds));
                if still_inside {
                    layout::reflow_list(&mut self.doc, parent_id);
                } else {
                    layout::detach_child(&mut self.doc, parent_id, drag.node);
                }
            } else {
                let moving = |id: NodeId| drag.origins.iter().any(|(o, _)| *o == id);
                // Only containable kinds can be adopted by a list; the
                // nest confirmation applies to any dragged node.
                let list_target = containable
                    .then(|| {
                        self.doc
                            .nodes
                            .iter()
                            .filter(|n| {
                                !moving(n.id) && n.kind.is_list() && n.bounds().intersects(&bounds)
                            })
                            .max_by_key(|n| n.z_index)
                            .map(|n| n.id)
                    })
                    .flatten();

                if let Some(list_id) = list_target {
                    layout::attach_child(&mut self.doc, list_id, drag.node);
                } else {
                    let nest_target = self
                        .doc
                        .nodes
                        .iter()
                        .filter(|n| {
                            !moving(n.id)
                                && matches!(
                                    n.kind,
                                    NodeKind::Folder { .. } | NodeKind::Character { .. }
                                )
                                && n.bounds().intersects(&bounds)
                        })
                        .max_by_key(|n| n.z_index)
                        .map(|n| n.id);
                    if let Some(target) = nest_target {
                        // The move commits regardless; nesting happens only
                        // if the embedder confirms.
                        requests.push(EditorRequest::ConfirmNestInto {
                            node: drag.node,
                            target,
                        });
                    }
                }
            }
        }

        self.commit();
        requests
    }

    fn apply_resize_mode(&mut self, mode: &Mode, canvas: Point) {
        let Mode::Resizing {
            node,
            start_pointer,
            start_width,
            start_height,
        } = *mode
        else {
            return;
        };
        let target_w = start_width + (canvas.x - start_pointer.x);
        let target_h = start_height + (canvas.y - start_pointer.y);
        let grid = self.grid();
        resize::apply_resize(&mut self.doc, node, target_w, target_h, grid);
    }
}
