//! Key-event propagation between the TUI widgets.

/// Whether a widget used a key event.
///
/// Input widgets return this from `handle_key_event` so the app can fall back
/// to its global bindings for keys the focused widget left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// The widget used the key; stop here.
    Consumed,
    /// The key is free for the next handler.
    NotConsumed,
}

impl EventStatus {
    pub fn is_consumed(self) -> bool {
        self == EventStatus::Consumed
    }
}
