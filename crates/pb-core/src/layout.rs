//! Containment and auto-layout for list containers.
//!
//! A list owns an ordered child sequence and derives its own size from it:
//! a header allowance, one fixed-height row per child kind, and uniform
//! spacing between rows. Children are stacked top-to-bottom and carry no
//! independent resize handles — resizing the container rescales them
//! proportionally instead (see `resize`).

use crate::id::NodeId;
use crate::model::{Document, NodeKind};

pub const LIST_HEADER_HEIGHT: f32 = 48.0;
pub const LIST_PADDING: f32 = 12.0;
pub const LIST_SPACING: f32 = 8.0;
pub const LIST_MIN_WIDTH: f32 = 260.0;
pub const LIST_MAX_WIDTH: f32 = 420.0;
pub const LIST_MAX_HEIGHT: f32 = 760.0;

/// Fixed row height per contained kind.
pub fn row_height(kind: &NodeKind) -> f32 {
    match kind {
        NodeKind::Character { .. } | NodeKind::Location { .. } => 72.0,
        NodeKind::Event { .. } => 96.0,
        NodeKind::Folder { .. } => 64.0,
        _ => 56.0,
    }
}

/// Minimum list size for a given child count (shortest possible rows).
pub fn list_min_size(child_count: usize) -> (f32, f32) {
    let rows = child_count as f32 * 56.0 + child_count.saturating_sub(1) as f32 * LIST_SPACING;
    let height = (LIST_HEADER_HEIGHT + 2.0 * LIST_PADDING + rows).min(LIST_MAX_HEIGHT);
    (LIST_MIN_WIDTH, height)
}

/// Recompute a list's size from its children and restack their rows.
pub fn reflow_list(doc: &mut Document, list_id: NodeId) {
    let Some(list) = doc.node(list_id) else {
        return;
    };
    let NodeKind::List { children, .. } = &list.kind else {
        return;
    };

    let children: Vec<NodeId> = children.iter().copied().collect();
    let heights: Vec<f32> = children
        .iter()
        .filter_map(|id| doc.node(*id).map(|n| row_height(&n.kind)))
        .collect();

    let rows: f32 = heights.iter().sum::<f32>()
        + heights.len().saturating_sub(1) as f32 * LIST_SPACING;
    let height =
        (LIST_HEADER_HEIGHT + 2.0 * LIST_PADDING + rows).clamp(list_min_size(0).1, LIST_MAX_HEIGHT);

    let (origin_x, origin_y, width) = {
        let list = match doc.node_mut(list_id) {
            Some(n) => n,
            None => return,
        };
        list.width = list.width.clamp(LIST_MIN_WIDTH, LIST_MAX_WIDTH);
        list.height = height;
        (list.x, list.y, list.width)
    };

    let inner_width = width - 2.0 * LIST_PADDING;
    let mut y = origin_y + LIST_HEADER_HEIGHT + LIST_PADDING;
    for (child_id, row) in children.iter().zip(heights) {
        if let Some(child) = doc.node_mut(*child_id) {
            child.x = origin_x + LIST_PADDING;
            child.y = y;
            child.width = inner_width;
            child.height = row;
        }
        y += row + LIST_SPACING;
    }
}

/// Move a free node into a list container.
///
/// Refused when the target is not a list, the child kind is not
/// containable, or the child already sits in a container (containment
/// depth is exactly 1). The child id is appended exactly once.
pub fn attach_child(doc: &mut Document, list_id: NodeId, child_id: NodeId) -> bool {
    if list_id == child_id {
        return false;
    }
    let eligible = doc
        .node(child_id)
        .is_some_and(|n| n.parent.is_none() && n.kind.containable());
    if !eligible {
        return false;
    }

    let Some(list) = doc.node_mut(list_id) else {
        return false;
    };
    let NodeKind::List { children, .. } = &mut list.kind else {
        return false;
    };
    if !children.contains(&child_id) {
        children.push(child_id);
    }

    if let Some(child) = doc.node_mut(child_id) {
        child.parent = Some(list_id);
    }
    reflow_list(doc, list_id);
    true
}

/// Release a child from its container back onto the free canvas.
pub fn detach_child(doc: &mut Document, list_id: NodeId, child_id: NodeId) -> bool {
    let mut removed = false;
    if let Some(list) = doc.node_mut(list_id)
        && let NodeKind::List { children, .. } = &mut list.kind
    {
        let before = children.len();
        children.retain(|id| *id != child_id);
        removed = children.len() != before;
    }

    if let Some(child) = doc.node_mut(child_id)
        && child.parent == Some(list_id)
    {
        child.parent = None;
    }
    if removed {
        reflow_list(doc, list_id);
    }
    removed
}

/// Rescale a list's children by the container's resize ratio, keeping
/// their offsets within the container proportional.
pub fn rescale_children(doc: &mut Document, list_id: NodeId, sx: f32, sy: f32) {
    let Some(list) = doc.node(list_id) else {
        return;
    };
    let (origin_x, origin_y) = (list.x, list.y);
    let children: Vec<NodeId> = doc.children_of(list_id).to_vec();

    for child_id in children {
        if let Some(child) = doc.node_mut(child_id) {
            child.x = origin_x + (child.x - origin_x) * sx;
            child.y = origin_y + (child.y - origin_y) * sy;
            child.width *= sx;
            child.height *= sy;
        }
    }
}
