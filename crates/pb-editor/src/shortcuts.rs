//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s, resolved
//! platform-aware: `meta` is ⌘ on macOS, `ctrl` serves the same role
//! elsewhere. While an editable text field has focus every binding is
//! suppressed so typing never mutates the canvas; leaving the field is
//! the text editor's own concern.

use crate::input::Modifiers;
use crate::session::Editor;
use crate::tools::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolSelect,
    ToolConnect,
    ToolText,
    ToolCharacter,
    ToolEvent,
    ToolLocation,
    ToolList,
    ToolLine,

    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Duplicate,
    Copy,
    Cut,
    Paste,

    // ── View ──
    ZoomIn,
    ZoomOut,

    // ── UI ──
    Escape,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the combo has no binding or an active text edit
    /// suppresses it.
    pub fn resolve(key: &str, modifiers: Modifiers, text_editing: bool) -> Option<ShortcutAction> {
        if text_editing {
            return None;
        }

        let cmd = modifiers.ctrl || modifiers.meta;

        // Modifier combos first (most specific).
        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                _ => None,
            };
        }

        // Single keys (no modifiers).
        match key {
            "v" | "V" => Some(ShortcutAction::ToolSelect),
            "c" | "C" => Some(ShortcutAction::ToolConnect),
            "t" | "T" => Some(ShortcutAction::ToolText),
            "h" | "H" => Some(ShortcutAction::ToolCharacter),
            "e" | "E" => Some(ShortcutAction::ToolEvent),
            "l" | "L" => Some(ShortcutAction::ToolLocation),
            "s" | "S" => Some(ShortcutAction::ToolList),
            "n" | "N" => Some(ShortcutAction::ToolLine),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Escape),
            _ => None,
        }
    }
}

impl Editor {
    /// Run a resolved shortcut action against the session.
    pub fn apply_action(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::ToolSelect => self.set_tool(ToolKind::Select),
            ShortcutAction::ToolConnect => self.set_tool(ToolKind::Connect),
            ShortcutAction::ToolText => self.set_tool(ToolKind::Text),
            ShortcutAction::ToolCharacter => self.set_tool(ToolKind::Character),
            ShortcutAction::ToolEvent => self.set_tool(ToolKind::Event),
            ShortcutAction::ToolLocation => self.set_tool(ToolKind::Location),
            ShortcutAction::ToolList => self.set_tool(ToolKind::List),
            ShortcutAction::ToolLine => self.set_tool(ToolKind::Line),

            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selection(),
            ShortcutAction::Duplicate => self.duplicate_selection(),
            ShortcutAction::Copy => self.copy_selection(),
            ShortcutAction::Cut => self.cut_selection(),
            ShortcutAction::Paste => self.paste(),

            ShortcutAction::ZoomIn => self.camera.zoom_in(),
            ShortcutAction::ZoomOut => self.camera.zoom_out(),

            ShortcutAction::Escape => self.escape(),
        }
    }

    /// Full keyboard path: resolve and apply in one step.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers, text_editing: bool) {
        if let Some(action) = ShortcutMap::resolve(key, modifiers, text_editing) {
            self.apply_action(action);
        }
    }
}
