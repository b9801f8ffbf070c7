//! Debounced free-text commits.
//!
//! Keystrokes into a text node buffer here and reach the canonical store
//! only after a quiet period, so a burst of typing becomes one history
//! entry. Losing focus does not flush immediately either: blur restarts
//! the same grace delay, giving late external mutations of the edited
//! element a window to fold into the same commit.
//!
//! Time is a caller-supplied millisecond timestamp. No timers, no clock
//! reads — the embedder drives `tick` from its own frame loop, and tests
//! drive it directly.

use crate::session::Editor;
use pb_core::id::NodeId;

/// Quiet period before buffered text commits, in milliseconds. Also the
/// blur grace delay.
pub const TEXT_COMMIT_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone, PartialEq)]
struct PendingEdit {
    node: NodeId,
    content: String,
    deadline: u64,
}

/// At most one buffered edit; switching nodes flushes the previous one.
#[derive(Debug, Default)]
pub struct TextDebounce {
    pending: Option<PendingEdit>,
}

impl TextDebounce {
    /// Buffer a keystroke, restarting the quiet period. Returns the
    /// previous edit when the keystroke targets a different node — that
    /// edit is due immediately.
    pub fn record(&mut self, node: NodeId, content: &str, now_ms: u64) -> Option<(NodeId, String)> {
        let flushed = match &self.pending {
            Some(p) if p.node != node => self.pending.take().map(|p| (p.node, p.content)),
            _ => None,
        };
        self.pending = Some(PendingEdit {
            node,
            content: content.to_string(),
            deadline: now_ms + TEXT_COMMIT_DEBOUNCE_MS,
        });
        flushed
    }

    /// The edited field lost focus: restart the grace delay so the edit
    /// commits shortly after, not instantly.
    pub fn blur(&mut self, now_ms: u64) {
        if let Some(pending) = &mut self.pending {
            pending.deadline = now_ms + TEXT_COMMIT_DEBOUNCE_MS;
        }
    }

    /// Return the buffered edit once its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Option<(NodeId, String)> {
        if self.pending.as_ref().is_some_and(|p| now_ms >= p.deadline) {
            self.pending.take().map(|p| (p.node, p.content))
        } else {
            None
        }
    }

    /// Hand back the buffered edit regardless of its deadline.
    pub fn flush(&mut self) -> Option<(NodeId, String)> {
        self.pending.take().map(|p| (p.node, p.content))
    }

    /// Discard the buffered edit, e.g. when its node was deleted or the
    /// store was replaced by undo/redo.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The node the buffered edit targets, if any.
    pub fn pending_node(&self) -> Option<NodeId> {
        self.pending.as_ref().map(|p| p.node)
    }
}

impl Editor {
    /// A keystroke in a text node's editor.
    pub fn text_input(&mut self, node: NodeId, content: &str, now_ms: u64) {
        if let Some((flushed, text)) = self.debounce.record(node, content, now_ms) {
            self.set_node_text(flushed, &text);
        }
    }

    /// The text editor lost focus.
    pub fn text_blur(&mut self, now_ms: u64) {
        self.debounce.blur(now_ms);
    }

    /// Frame-loop driver: commit any buffered edit whose quiet period has
    /// elapsed.
    pub fn tick(&mut self, now_ms: u64) {
        if let Some((node, content)) = self.debounce.poll(now_ms) {
            self.set_node_text(node, &content);
        }
    }
}
