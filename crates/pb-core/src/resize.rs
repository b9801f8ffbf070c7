//! Per-kind resize policy and table column width transfer.
//!
//! Out-of-range geometry is corrected by clamping at computation time,
//! never by raising an error. Grid snapping rounds the result first and
//! re-clamps afterwards, so snapping can never produce an undersized node.

use crate::id::NodeId;
use crate::layout;
use crate::model::{Document, NodeKind};

/// Lower bound for a single table column, in percent of table width.
pub const MIN_COLUMN_PCT: f32 = 10.0;

/// Estimated compact-text height for a given content and width.
fn compact_text_height(content: &str, width: f32) -> f32 {
    let chars_per_line = (width / 8.0).max(1.0);
    let lines = (content.len() as f32 / chars_per_line).ceil().max(1.0);
    lines * 20.0 + 16.0
}

fn snap(value: f32, grid: Option<f32>) -> f32 {
    match grid {
        Some(step) if step > 0.0 => (value / step).round() * step,
        _ => value,
    }
}

/// Resize a node to the requested target size, applying the kind's policy.
///
/// | Kind | Policy |
/// |---|---|
/// | default | independent w/h, clamped to the kind minimum |
/// | image | both dims locked to the natural aspect ratio |
/// | table | width only |
/// | list | both dims; children rescale by the same ratio |
/// | compact-text | width only; height derives from content |
pub fn apply_resize(
    doc: &mut Document,
    id: NodeId,
    target_w: f32,
    target_h: f32,
    grid: Option<f32>,
) {
    let Some(node) = doc.node(id) else {
        return;
    };
    let (min_w, min_h) = node.kind.min_size();
    let (old_w, old_h) = (node.width, node.height);

    match &node.kind {
        NodeKind::Image {
            natural_width,
            natural_height,
            ..
        } => {
            let aspect = if *natural_height > 0.0 {
                natural_width / natural_height
            } else {
                1.0
            };
            let mut w = snap(target_w, grid).max(min_w);
            let mut h = w / aspect;
            if h < min_h {
                h = min_h;
                w = h * aspect;
            }
            if let Some(node) = doc.node_mut(id) {
                node.width = w;
                node.height = h;
            }
        }
        NodeKind::Table { .. } => {
            let w = snap(target_w, grid).max(min_w);
            if let Some(node) = doc.node_mut(id) {
                node.width = w;
            }
        }
        NodeKind::CompactText { content } => {
            let w = snap(target_w, grid).max(min_w);
            let h = compact_text_height(content, w);
            if let Some(node) = doc.node_mut(id) {
                node.width = w;
                node.height = h;
            }
        }
        NodeKind::List { .. } => {
            let w = snap(target_w, grid)
                .clamp(layout::LIST_MIN_WIDTH, layout::LIST_MAX_WIDTH);
            let h = snap(target_h, grid).clamp(min_h, layout::LIST_MAX_HEIGHT);
            if let Some(node) = doc.node_mut(id) {
                node.width = w;
                node.height = h;
            }
            // Children rescale by the container's ratio — they carry no
            // resize handles of their own.
            layout::rescale_children(doc, id, w / old_w, h / old_h);
        }
        _ => {
            let w = snap(target_w, grid).max(min_w);
            let h = snap(target_h, grid).max(min_h);
            if let Some(node) = doc.node_mut(id) {
                node.width = w;
                node.height = h;
            }
        }
    }
}

/// Transfer width between the columns on either side of `boundary`.
///
/// The pointer's incremental horizontal delta (in canvas pixels since the
/// last sample) becomes a percentage of total table width, moved from one
/// neighbor to the other. Both results are floored at `MIN_COLUMN_PCT`;
/// any shortfall from hitting the floor is given back to the other column,
/// so the pair's combined percentage — and the total — is invariant.
pub fn transfer_column_width(
    columns: &mut [f32],
    boundary: usize,
    delta_px: f32,
    table_width: f32,
) {
    if table_width <= 0.0 || boundary + 1 >= columns.len() {
        return;
    }
    let delta_pct = delta_px / table_width * 100.0;
    let pair = columns[boundary] + columns[boundary + 1];

    let mut left = columns[boundary] + delta_pct;
    let mut right = pair - left;
    if left < MIN_COLUMN_PCT {
        left = MIN_COLUMN_PCT;
        right = pair - left;
    }
    if right < MIN_COLUMN_PCT {
        right = MIN_COLUMN_PCT;
        left = pair - right;
    }
    columns[boundary] = left;
    columns[boundary + 1] = right;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use smallvec::smallvec;

    #[test]
    fn image_resize_preserves_aspect() {
        let mut doc = Document::new();
        let id = doc.add_node(Node::new(
            NodeId::intern("photo"),
            0.0,
            0.0,
            NodeKind::Image {
                source: "map.png".into(),
                natural_width: 1600.0,
                natural_height: 900.0,
            },
        ));

        for target in [537.0, 203.1, 50.0, 4000.0] {
            apply_resize(&mut doc, id, target, 10.0, None);
            let node = doc.node(id).unwrap();
            let ratio = node.width / node.height;
            assert!(
                (ratio - 1600.0 / 900.0).abs() < 0.01,
                "aspect drifted at target {target}: {}×{}",
                node.width,
                node.height
            );
            assert!(node.width >= 200.0 && node.height >= 200.0);
        }
    }

    #[test]
    fn table_resizes_width_only() {
        let mut doc = Document::new();
        let id = doc.add_node(Node::new(
            NodeId::intern("timeline"),
            0.0,
            0.0,
            NodeKind::Table {
                columns: smallvec![25.0, 25.0, 25.0, 25.0],
                rows: 3,
            },
        ));
        let old_h = doc.node(id).unwrap().height;

        apply_resize(&mut doc, id, 100.0, 500.0, None);
        let node = doc.node(id).unwrap();
        // Four columns → minimum width is max(150, 60×4) = 240.
        assert_eq!(node.width, 240.0);
        assert_eq!(node.height, old_h);
    }

    #[test]
    fn grid_snap_cannot_undersize() {
        let mut doc = Document::new();
        let id = doc.add_node(Node::new(
            NodeId::intern("note"),
            0.0,
            0.0,
            NodeKind::Text {
                content: String::new(),
            },
        ));

        // 123 snaps to 100 on a 50px grid, below the 120 minimum — the
        // re-clamp wins.
        apply_resize(&mut doc, id, 123.0, 81.0, Some(50.0));
        let node = doc.node(id).unwrap();
        assert_eq!(node.width, 120.0);
        assert_eq!(node.height, 100.0);
    }

    #[test]
    fn compact_text_derives_height() {
        let mut doc = Document::new();
        let id = doc.add_node(Node::new(
            NodeId::intern("caption"),
            0.0,
            0.0,
            NodeKind::CompactText {
                content: "a".repeat(120),
            },
        ));

        apply_resize(&mut doc, id, 240.0, 999.0, None);
        let narrow = doc.node(id).unwrap().height;
        apply_resize(&mut doc, id, 480.0, 999.0, None);
        let wide = doc.node(id).unwrap().height;
        assert!(narrow > wide, "narrower box needs more lines");
        // Requested height is ignored entirely.
        assert_ne!(doc.node(id).unwrap().height, 999.0);
    }

    #[test]
    fn column_sum_invariant_across_incremental_drag() {
        let mut columns = [40.0f32, 30.0, 30.0];
        // Simulate a jittery drag of the first boundary, including pushes
        // past the floor in both directions.
        for delta in [12.0, 12.0, 12.0, -3.0, 80.0, -200.0, 5.5] {
            transfer_column_width(&mut columns, 0, delta, 400.0);
            let sum: f32 = columns.iter().sum();
            assert!((sum - 100.0).abs() < 0.001, "sum drifted: {columns:?}");
            assert!(columns.iter().all(|c| *c >= MIN_COLUMN_PCT - 0.001));
        }
        // Untouched column keeps its width.
        assert!((columns[2] - 30.0).abs() < 0.001);
    }

    #[test]
    fn column_floor_redistributes_to_neighbor() {
        let mut columns = [50.0f32, 50.0];
        transfer_column_width(&mut columns, 0, 10_000.0, 400.0);
        assert!((columns[1] - MIN_COLUMN_PCT).abs() < 0.001);
        assert!((columns[0] - 90.0).abs() < 0.001);
    }
}
