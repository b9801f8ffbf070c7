//! The tool palette: what a pointer-down on the canvas means.
//!
//! `Select` is the neutral tool (drag, marquee, resize). `Connect` and
//! `Relationship` toggle links between node pairs. Every other tool places
//! one node per click.

use pb_core::camera::Point;
use pb_core::model::{ConnectionKind, NodeKind};
use smallvec::smallvec;

/// Canvas-space offset subtracted from the click point when placing a
/// node, so the new node lands under the cursor rather than at its corner.
pub const PLACE_GRAB_OFFSET: Point = Point::new(100.0, 60.0);

/// The active tool determines how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Connect,
    Relationship,
    Text,
    CompactText,
    Character,
    Event,
    Location,
    Folder,
    List,
    Image,
    Table,
    Line,
}

impl ToolKind {
    /// Template payload for creation tools; `None` for select/connect.
    pub fn creates(&self) -> Option<NodeKind> {
        match self {
            ToolKind::Text => Some(NodeKind::Text {
                content: String::new(),
            }),
            ToolKind::CompactText => Some(NodeKind::CompactText {
                content: String::new(),
            }),
            ToolKind::Character => Some(NodeKind::Character {
                name: String::new(),
                canvas: None,
            }),
            ToolKind::Event => Some(NodeKind::Event {
                title: String::new(),
            }),
            ToolKind::Location => Some(NodeKind::Location {
                name: String::new(),
            }),
            ToolKind::Folder => Some(NodeKind::Folder {
                label: String::new(),
                canvas: None,
            }),
            ToolKind::List => Some(NodeKind::List {
                title: String::new(),
                children: smallvec![],
            }),
            ToolKind::Image => Some(NodeKind::Image {
                source: String::new(),
                natural_width: 200.0,
                natural_height: 200.0,
            }),
            ToolKind::Table => Some(NodeKind::Table {
                columns: smallvec![25.0, 25.0, 25.0, 25.0],
                rows: 3,
            }),
            ToolKind::Line => Some(NodeKind::Line {
                points: [
                    Point::new(0.0, 50.0),
                    Point::new(100.0, 0.0),
                    Point::new(200.0, 50.0),
                ],
            }),
            ToolKind::Select | ToolKind::Connect | ToolKind::Relationship => None,
        }
    }

    /// The connection kind a connect-style tool toggles, if any.
    pub fn connects(&self) -> Option<ConnectionKind> {
        match self {
            ToolKind::Connect => Some(ConnectionKind::Sequence),
            ToolKind::Relationship => Some(ConnectionKind::Relationship),
            _ => None,
        }
    }
}
