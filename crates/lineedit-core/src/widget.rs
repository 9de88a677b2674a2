//! Widget and input-handler contracts.
//!
//! Addons implement [`Widget`] and are installed into the application's addon
//! slot; key bindings implement [`Handler`]. Both are object-safe so the slot
//! can hold any addon kind behind `Arc<dyn Widget>`.

use std::any::Any;

use crate::render::TextBuffer;
use crate::term::Event;

/// Handles one input event, reporting whether it was consumed.
pub trait Handler: Send + Sync {
    /// Handle `event`; `true` means the event was consumed.
    fn handle(&self, event: &Event) -> bool;
}

/// A handler that consumes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyHandler;

impl Handler for DummyHandler {
    fn handle(&self, _event: &Event) -> bool {
        false
    }
}

impl<F> Handler for F
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn handle(&self, event: &Event) -> bool {
        self(event)
    }
}

/// A renderable component that can occupy the application's addon slot.
pub trait Widget: Send + Sync {
    /// Render into a buffer at most `width` cells wide and `height` lines
    /// tall. Must not fail; `height == 0` yields an empty rendering.
    fn render(&self, width: usize, height: usize) -> TextBuffer;

    /// Handle an input event; `true` means consumed.
    fn handle(&self, event: &Event) -> bool;

    /// Whether the terminal cursor belongs inside this widget. Passive
    /// overlays return `false` so the cursor stays in the code area.
    fn focus(&self) -> bool {
        true
    }

    /// The concrete widget, for type-identity checks on the addon slot.
    fn as_any(&self) -> &dyn Any;
}
