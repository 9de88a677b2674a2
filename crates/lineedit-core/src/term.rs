//! Terminal input events.
//!
//! The kernel never reads the terminal itself; frontends decode their event
//! source (e.g. `crossterm`) into these values and feed them to
//! [`App::handle_event`](crate::App::handle_event).

/// A single decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character without modifiers.
    Char(char),
    /// A character pressed together with Ctrl.
    Ctrl(char),
    /// A character pressed together with Alt.
    Alt(char),
    /// The Enter / Return key.
    Enter,
    /// The Tab key.
    Tab,
    /// The Backspace key.
    Backspace,
    /// The forward-delete key.
    Delete,
    /// The up arrow.
    Up,
    /// The down arrow.
    Down,
    /// The left arrow.
    Left,
    /// The right arrow.
    Right,
    /// The Home key.
    Home,
    /// The End key.
    End,
    /// The Escape key.
    Esc,
}

/// An input event delivered to widgets and the code area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(Key),
    /// A bracketed paste.
    Paste(String),
}
