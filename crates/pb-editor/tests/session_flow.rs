//! End-to-end session flows: tool clicks, gestures, shortcuts, history,
//! and the persistence bridge working together.

use pb_core::camera::Point;
use pb_core::model::NodeKind;
use pb_editor::{
    Editor, Hit, InputEvent, MemoryBridge, MemorySettings, Modifiers, PointerButton, ToolKind,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn editor() -> Editor {
    Editor::new(
        Box::new(MemoryBridge::default()),
        Box::new(MemorySettings::default()),
    )
}

fn down(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerDown {
        x,
        y,
        button: PointerButton::Primary,
        modifiers: Modifiers::NONE,
    }
}

fn mv(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerMove {
        x,
        y,
        modifiers: Modifiers::NONE,
    }
}

fn up(x: f32, y: f32) -> InputEvent {
    InputEvent::PointerUp {
        x,
        y,
        modifiers: Modifiers::NONE,
    }
}

/// Click a creation tool, then drag the node somewhere else, then undo
/// both steps and redo them. Every gesture is exactly one history entry.
#[test]
fn create_drag_undo_redo_roundtrip() {
    let mut editor = editor();

    editor.set_tool(ToolKind::Event);
    editor.pointer_down(&down(300.0, 200.0), Hit::Empty, false);
    let id = editor.selection.primary().expect("created node is selected");
    let created = editor.doc.node(id).unwrap();
    assert_eq!((created.x, created.y), (200.0, 140.0));

    editor.set_tool(ToolKind::Select);
    editor.pointer_down(&down(210.0, 150.0), Hit::Node(id), false);
    editor.pointer_move(&mv(410.0, 250.0));
    editor.pointer_up(&up(410.0, 250.0));
    let moved = editor.doc.node(id).unwrap();
    assert_eq!((moved.x, moved.y), (400.0, 240.0));

    // Seed + create + drag.
    assert_eq!(editor.history.len(), 3);

    editor.undo();
    assert_eq!(editor.doc.node(id).unwrap().x, 200.0);
    editor.undo();
    assert!(editor.doc.nodes.is_empty());
    assert!(editor.selection.is_empty());

    editor.redo();
    editor.redo();
    assert_eq!(editor.doc.node(id).unwrap().x, 400.0);
}

/// Build a cast list by dropping characters into a list container, then
/// undo the containment and check both sides of the relation roll back.
#[test]
fn containment_via_gestures_rolls_back_cleanly() {
    let mut editor = editor();

    editor.set_tool(ToolKind::List);
    editor.pointer_down(&down(800.0, 160.0), Hit::Empty, false);
    let list = editor.selection.primary().unwrap();

    editor.set_tool(ToolKind::Character);
    editor.pointer_down(&down(200.0, 200.0), Hit::Empty, false);
    let hero = editor.selection.primary().unwrap();

    // Drag the character onto the list.
    editor.set_tool(ToolKind::Select);
    let list_center = editor.doc.node(list).unwrap().bounds().center();
    let start = editor.doc.node(hero).unwrap().bounds().center();
    editor.pointer_down(&down(start.x, start.y), Hit::Node(hero), false);
    editor.pointer_move(&mv(list_center.x, list_center.y));
    let requests = editor.pointer_up(&up(list_center.x, list_center.y));

    assert!(requests.is_empty());
    assert_eq!(editor.doc.node(hero).unwrap().parent, Some(list));
    assert_eq!(editor.doc.children_of(list), &[hero]);
    // The container grew to hold its row.
    let grown = editor.doc.node(list).unwrap().height;

    editor.undo();
    assert_eq!(editor.doc.node(hero).unwrap().parent, None);
    assert!(editor.doc.children_of(list).is_empty());
    assert!(editor.doc.node(list).unwrap().height < grown);
}

/// The full keyboard path: duplicate with ⌘D, delete with Backspace,
/// undo with ⌘Z.
#[test]
fn keyboard_driven_editing() {
    let mut editor = editor();
    let cmd = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    editor.set_tool(ToolKind::Location);
    editor.pointer_down(&down(400.0, 300.0), Hit::Empty, false);
    assert_eq!(editor.doc.nodes.len(), 1);

    editor.key_down("d", cmd, false);
    assert_eq!(editor.doc.nodes.len(), 2);

    editor.key_down("Backspace", Modifiers::NONE, false);
    assert_eq!(editor.doc.nodes.len(), 1);

    editor.key_down("z", cmd, false);
    assert_eq!(editor.doc.nodes.len(), 2);

    // While a text field has focus the same keys do nothing — Escape
    // included, so the selection survives.
    editor.key_down("Backspace", Modifiers::NONE, true);
    assert_eq!(editor.doc.nodes.len(), 2);

    let id = editor.doc.nodes[0].id;
    editor.selection.select_one(id);
    editor.key_down("Escape", Modifiers::NONE, true);
    assert_eq!(editor.selection.ids(), &[id]);

    editor.key_down("Escape", Modifiers::NONE, false);
    assert!(editor.selection.is_empty());
}

/// Every committed gesture reaches the bridge exactly once; selection and
/// camera changes never do.
#[test]
fn bridge_sees_one_save_per_commit() {
    let saves = Arc::new(AtomicUsize::new(0));
    let bridge = MemoryBridge {
        save_count: Arc::clone(&saves),
        ..Default::default()
    };
    let mut editor = Editor::new(Box::new(bridge), Box::new(MemorySettings::default()));

    editor.set_tool(ToolKind::Folder);
    editor.pointer_down(&down(300.0, 300.0), Hit::Empty, false);
    let id = editor.selection.primary().unwrap();
    assert_eq!(saves.load(Ordering::Relaxed), 1);

    // Marquee selection: no store change, no save.
    editor.set_tool(ToolKind::Select);
    editor.pointer_down(&down(900.0, 900.0), Hit::Empty, false);
    editor.pointer_move(&mv(100.0, 100.0));
    editor.pointer_up(&up(100.0, 100.0));
    assert_eq!(editor.selection.ids(), &[id]);
    assert_eq!(saves.load(Ordering::Relaxed), 1);

    // A drag commits once despite many moves.
    let center = editor.doc.node(id).unwrap().bounds().center();
    editor.pointer_down(&down(center.x, center.y), Hit::Node(id), false);
    for step in 1..=10 {
        editor.pointer_move(&mv(center.x + 10.0 * step as f32, center.y));
    }
    editor.pointer_up(&up(center.x + 100.0, center.y));
    assert_eq!(saves.load(Ordering::Relaxed), 2);

    // Undo and redo each push the replaced state to the bridge.
    editor.undo();
    editor.redo();
    assert_eq!(saves.load(Ordering::Relaxed), 4);
}

/// A reloaded session picks up exactly what the previous one saved.
#[test]
fn saved_state_survives_a_session_restart() {
    let saves = Arc::new(AtomicUsize::new(0));
    let mut first = Editor::new(
        Box::new(MemoryBridge {
            save_count: Arc::clone(&saves),
            ..Default::default()
        }),
        Box::new(MemorySettings::default()),
    );

    first.set_tool(ToolKind::Text);
    first.pointer_down(&down(140.0, 80.0), Hit::Empty, false);
    let id = first.selection.primary().unwrap();
    first.set_node_text(id, "chapter one");

    let stored = (first.doc.nodes.clone(), first.doc.connections.clone());
    let second = Editor::new(
        Box::new(MemoryBridge {
            stored: Some(stored),
            ..Default::default()
        }),
        Box::new(MemorySettings::default()),
    );

    let node = second.doc.node(id).unwrap();
    assert_eq!((node.x, node.y), (40.0, 20.0));
    let NodeKind::Text { content } = &node.kind else {
        panic!("expected the text node back");
    };
    assert_eq!(content, "chapter one");
    // The restored state is the undo floor, not an undoable step.
    assert!(!second.history.can_undo());
}

/// Zoomed-and-panned placement still lands under the cursor.
#[test]
fn placement_accounts_for_camera() {
    let mut editor = editor();
    editor.camera.set_zoom(2.0);
    editor.camera.pan_by(100.0, 50.0);

    editor.set_tool(ToolKind::Text);
    let screen = Point::new(580.0, 290.0);
    // to_canvas: ((580 − 100) / 2, (290 − 50) / 2) = (240, 120).
    editor.pointer_down(
        &InputEvent::PointerDown {
            x: screen.x,
            y: screen.y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        },
        Hit::Empty,
        false,
    );

    let id = editor.selection.primary().unwrap();
    let node = editor.doc.node(id).unwrap();
    assert_eq!((node.x, node.y), (140.0, 60.0));
}
