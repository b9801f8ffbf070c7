//! PlotBoard editor: the interactive layer over `pb-core`.
//!
//! Owns the editing session (store + camera + selection + history), the
//! pointer-driven interaction machine, the tool palette, keyboard
//! shortcuts, debounced text commits, and the seams to the embedder —
//! persistence, settings, and navigation requests. Headless by design:
//! the embedder feeds input events and renders from the session state.

pub mod bridge;
pub mod debounce;
pub mod input;
pub mod interaction;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use bridge::{
    EditorRequest, EditorSettings, MemoryBridge, MemorySettings, PersistenceBridge, SettingsStore,
};
pub use debounce::{TEXT_COMMIT_DEBOUNCE_MS, TextDebounce};
pub use input::{InputEvent, Modifiers, PointerButton};
pub use interaction::{DRAG_THRESHOLD, DragState, Hit, Mode};
pub use session::{Editor, Selection};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{PLACE_GRAB_OFFSET, ToolKind};
