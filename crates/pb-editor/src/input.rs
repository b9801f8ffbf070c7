//! Raw pointer input events fed to the interaction machine.
//!
//! Coordinates are screen-space; the machine converts to canvas space
//! through the session camera. Touch input maps onto the same events
//! (first touch = primary pointer).

use pb_core::camera::Point;

/// Modifier key state captured with each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };

    /// Any modifier held at all.
    pub fn any(&self) -> bool {
        self.shift || self.alt || self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// One pointer event. Gestures attach transient global move/up listeners
/// for their duration; `PointerCancel` covers the pointer leaving the
/// window mid-gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    PointerCancel {
        x: f32,
        y: f32,
    },
}

impl InputEvent {
    /// The event's screen position.
    pub fn position(&self) -> Point {
        match *self {
            InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerMove { x, y, .. }
            | InputEvent::PointerUp { x, y, .. }
            | InputEvent::PointerCancel { x, y } => Point::new(x, y),
        }
    }
}
