//! Application state and the host-side accessor surface.
//!
//! # Overview
//!
//! [`App`] is a cheaply cloneable handle over the whole editor: the code area,
//! the single addon slot, and the host hooks (notifications, redraw
//! requests). State mutation goes through scoped accessors — `mutate_state`
//! runs a closure under the state lock, `copy_state` returns a snapshot — and
//! no lock is ever held across a call into a widget or handler.
//!
//! # Example
//!
//! ```rust
//! use lineedit_core::{App, AppSpec};
//! use lineedit_core::term::{Event, Key};
//!
//! let app = App::new(AppSpec {
//!     prompt: "~> ".to_string(),
//!     ..Default::default()
//! });
//! app.handle_event(&Event::Key(Key::Char('x')));
//! assert_eq!(app.codearea().copy_state().buffer.content, "x");
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use crate::codearea::CodeArea;
use crate::render::TextBuffer;
use crate::term::Event;
use crate::widget::Widget;

/// Fire-and-forget status notification hook.
pub type NotifyFn = Box<dyn Fn(&str) + Send + Sync>;
/// Asynchronous redraw request hook.
pub type RedrawFn = Box<dyn Fn() + Send + Sync>;

/// Construction-time configuration for [`App`].
///
/// Unset hooks are defaulted when the app is built, so a constructed app is
/// always fully valid: notifications are dropped and redraw requests do
/// nothing.
#[derive(Default)]
pub struct AppSpec {
    /// Receives status notifications.
    pub notify: Option<NotifyFn>,
    /// Called when a redraw is wanted.
    pub redraw: Option<RedrawFn>,
    /// Prompt shown before the edit buffer.
    pub prompt: String,
}

/// Mutable application state guarded by the [`App`] accessor.
#[derive(Clone, Default)]
pub struct AppState {
    /// The single addon slot; `None` when no addon is active.
    ///
    /// Several addon kinds share this slot, so owners must check the
    /// installed value by concrete type (via [`Widget::as_any`]) before
    /// clearing it.
    pub addon: Option<Arc<dyn Widget>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("addon", &self.addon.as_ref().map(|_| "<widget>"))
            .finish()
    }
}

struct AppInner {
    state: Mutex<AppState>,
    codearea: CodeArea,
    notify: NotifyFn,
    redraw: RedrawFn,
}

/// Cheaply cloneable handle to the application.
#[derive(Clone)]
pub struct App {
    inner: Arc<AppInner>,
}

impl App {
    /// Build an app from a spec, filling in defaults for unset hooks.
    pub fn new(spec: AppSpec) -> Self {
        Self {
            inner: Arc::new(AppInner {
                state: Mutex::new(AppState::default()),
                codearea: CodeArea::new(spec.prompt),
                notify: spec.notify.unwrap_or_else(|| Box::new(|_| {})),
                redraw: spec.redraw.unwrap_or_else(|| Box::new(|| {})),
            }),
        }
    }

    /// Apply `f` to the application state under the state lock.
    ///
    /// `f` must not call back into the app.
    pub fn mutate_state(&self, f: impl FnOnce(&mut AppState)) {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    /// Return a snapshot of the application state.
    pub fn copy_state(&self) -> AppState {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The code area owned by this app.
    pub fn codearea(&self) -> &CodeArea {
        &self.inner.codearea
    }

    /// Send a status notification to the host.
    pub fn notify(&self, message: &str) {
        (self.inner.notify)(message);
    }

    /// Hint that the UI should be redrawn.
    pub fn redraw(&self) {
        (self.inner.redraw)();
    }

    /// Dispatch an input event.
    ///
    /// The active addon (if any) sees the event first; unconsumed events fall
    /// through to the code area's default editing. The addon is cloned out of
    /// the slot before being invoked, so no state lock is held during
    /// dispatch.
    pub fn handle_event(&self, event: &Event) -> bool {
        if let Some(addon) = self.copy_state().addon {
            if addon.handle(event) {
                return true;
            }
        }
        self.inner.codearea.handle_default(event)
    }

    /// Render the code area with the addon rendering (if any) stacked below.
    ///
    /// The addon gets the lines left over after the code area; the dot stays
    /// in the code area unless the addon reports focus.
    pub fn render(&self, width: usize, height: usize) -> TextBuffer {
        let addon = self.copy_state().addon;
        let codearea_height = match &addon {
            Some(_) => height.saturating_sub(1),
            None => height,
        };
        let mut buf = self.inner.codearea.render(width, codearea_height);
        if let Some(addon) = addon {
            let rest = height.saturating_sub(buf.line_count());
            let addon_buf = addon.render(width, rest);
            buf.extend(addon_buf, addon.focus());
        }
        buf
    }
}
