//! The history-walk addon.
//!
//! # Overview
//!
//! A transient overlay for the line editor: it cycles backward and forward
//! through prefix-matching history entries, previewing each candidate in the
//! code area's pending span. Accepting commits the preview into the buffer;
//! closing restores the buffer untouched.
//!
//! The addon occupies the application's single addon slot for the duration of
//! one walk session. [`start`] installs it, [`prev`]/[`next`] step the
//! walker and re-synchronize the preview, and [`close`]/[`accept`] tear it
//! down. All operations locate the installed widget by concrete type, so a
//! different addon occupying the slot is never disturbed.
//!
//! # Example
//!
//! ```rust
//! use lineedit_core::{App, AppSpec};
//! use lineedit_history::histwalk::{self, Config};
//! use lineedit_history::{MemStore, PrefixWalker};
//!
//! let app = App::new(AppSpec::default());
//! app.codearea().mutate(|s| s.buffer.insert_at_dot("gi"));
//!
//! let mut store = MemStore::new();
//! store.add_cmd("git status");
//! store.add_cmd("ls");
//! store.add_cmd("git commit");
//!
//! let walker = PrefixWalker::new(store.cmds().to_vec(), "gi");
//! histwalk::start(&app, Config {
//!     walker: Some(Box::new(walker)),
//!     ..Default::default()
//! });
//! assert_eq!(app.codearea().copy_state().pending.content, "t commit");
//!
//! histwalk::prev(&app).unwrap();
//! histwalk::accept(&app);
//! assert_eq!(app.codearea().copy_state().buffer.content, "git status");
//! ```

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use lineedit_core::app::App;
use lineedit_core::codearea::{CodeArea, Pending};
use lineedit_core::render::{BufferBuilder, STYLE_MODE_LINE, TextBuffer};
use lineedit_core::term::Event;
use lineedit_core::widget::{DummyHandler, Handler, Widget};

use crate::walker::{WalkError, Walker};

/// Errors reported by [`prev`] and [`next`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistwalkError {
    /// The histwalk addon is not active.
    #[error("the histwalk addon is not active")]
    Inactive,
    /// The walker failed to step; the preview is unchanged.
    #[error(transparent)]
    Walk(#[from] WalkError),
}

/// Configuration for starting a walk.
#[derive(Default)]
pub struct Config {
    /// Keybinding; unset means the addon consumes no keys itself.
    pub binding: Option<Box<dyn Handler>>,
    /// The history walker. Required.
    pub walker: Option<Box<dyn Walker>>,
}

/// Walk state captured at [`start`]: the live walker plus the byte length of
/// the fixed search prefix.
struct WalkSession {
    walker: Box<dyn Walker>,
    prefix_len: usize,
}

impl WalkSession {
    /// Write the current entry into the code area's pending span.
    ///
    /// The span is `[prefix_len, content_len)` and the replacement is the
    /// current command with the prefix stripped. The walker contract
    /// guarantees the command starts with the prefix; that is not re-checked
    /// here.
    fn resync(&self, codearea: &CodeArea) {
        let Some(entry) = self.walker.current() else {
            return;
        };
        let from = self.prefix_len;
        let content = entry.cmd[from..].to_string();
        codearea.mutate(|s| {
            s.pending = Pending {
                from,
                to: s.buffer.content.len(),
                content,
            };
        });
    }
}

/// The installed overlay widget for one walk session.
///
/// Holds the walker exclusively until the session ends. The widget is a
/// passive overlay: it never takes focus, and keys its binding does not
/// consume fall through to the code area.
pub struct HistwalkWidget {
    binding: Box<dyn Handler>,
    codearea: CodeArea,
    session: Mutex<WalkSession>,
}

impl HistwalkWidget {
    fn lock_session(&self) -> MutexGuard<'_, WalkSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Widget for HistwalkWidget {
    fn render(&self, width: usize, height: usize) -> TextBuffer {
        let seq = self
            .lock_session()
            .walker
            .current()
            .map(|entry| entry.seq)
            .unwrap_or_default();
        let mut buf = BufferBuilder::new(width)
            .write_str(&format!(" HISTORY #{seq} "), &[STYLE_MODE_LINE])
            .buffer();
        buf.trim_to_lines(0, height);
        buf
    }

    fn handle(&self, event: &Event) -> bool {
        self.binding.handle(event)
    }

    fn focus(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Start the histwalk addon.
///
/// Takes one backward step before the first render, so the first visible
/// entry is the newest one matching the prefix, and runs one
/// resynchronization so the preview is in place before the next redraw.
///
/// A missing walker, or a walker with no matching entry at all, leaves the
/// application untouched apart from a single notification.
pub fn start(app: &App, config: Config) {
    let Some(mut walker) = config.walker else {
        app.notify("no history walker");
        return;
    };
    let prefix_len = walker.prefix().len();
    if walker.prev().is_err() {
        app.notify("no matching history entry");
        return;
    }

    let widget = Arc::new(HistwalkWidget {
        binding: config.binding.unwrap_or_else(|| Box::new(DummyHandler)),
        codearea: app.codearea().clone(),
        session: Mutex::new(WalkSession { walker, prefix_len }),
    });
    widget.lock_session().resync(&widget.codearea);
    app.mutate_state(move |s| s.addon = Some(widget));
    app.redraw();
}

/// Walk to the previous (older) entry.
///
/// Returns [`HistwalkError::Inactive`] if the addon is not active, and the
/// walker's own error if the walk is already at the oldest matching entry; in
/// both cases nothing is mutated.
pub fn prev(app: &App) -> Result<(), HistwalkError> {
    walk(app, |session| session.walker.prev())
}

/// Walk to the next (newer) entry.
///
/// Returns [`HistwalkError::Inactive`] if the addon is not active, and the
/// walker's own error if the walk is already at the newest matching entry; in
/// both cases nothing is mutated.
pub fn next(app: &App) -> Result<(), HistwalkError> {
    walk(app, |session| session.walker.next())
}

/// Close the histwalk addon, discarding the preview.
///
/// Does nothing if the histwalk addon is not active.
pub fn close(app: &App) {
    if close_addon(app) {
        app.codearea().mutate(|s| s.pending = Pending::default());
    }
}

/// Close the histwalk addon, accepting the currently shown command.
///
/// Does nothing if the histwalk addon is not active.
pub fn accept(app: &App) {
    if close_addon(app) {
        app.codearea().mutate(|s| s.apply_pending());
    }
}

/// Clear the addon slot if (and only if) it holds a histwalk widget.
fn close_addon(app: &App) -> bool {
    let mut closed = false;
    app.mutate_state(|s| {
        let mine = s
            .addon
            .as_ref()
            .is_some_and(|addon| addon.as_any().is::<HistwalkWidget>());
        if mine {
            s.addon = None;
            closed = true;
        }
    });
    closed
}

fn walk(
    app: &App,
    f: impl FnOnce(&mut WalkSession) -> Result<(), WalkError>,
) -> Result<(), HistwalkError> {
    let state = app.copy_state();
    let Some(addon) = state.addon else {
        return Err(HistwalkError::Inactive);
    };
    let Some(widget) = addon.as_any().downcast_ref::<HistwalkWidget>() else {
        return Err(HistwalkError::Inactive);
    };
    let mut session = widget.lock_session();
    f(&mut session)?;
    session.resync(&widget.codearea);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineedit_core::app::AppSpec;
    use lineedit_core::term::Key;
    use pretty_assertions::assert_eq;

    use crate::store::Entry;
    use crate::walker::PrefixWalker;

    fn entries(cmds: &[&str]) -> Vec<Entry> {
        cmds.iter()
            .enumerate()
            .map(|(seq, cmd)| Entry {
                seq: seq as u64,
                cmd: cmd.to_string(),
            })
            .collect()
    }

    fn app_with_buffer(content: &str) -> App {
        let app = App::new(AppSpec::default());
        app.codearea().mutate(|s| s.buffer.insert_at_dot(content));
        app
    }

    fn start_walk(app: &App, cmds: &[&str], prefix: &str) {
        let walker = PrefixWalker::new(entries(cmds), prefix);
        start(
            app,
            Config {
                binding: None,
                walker: Some(Box::new(walker)),
            },
        );
    }

    fn active(app: &App) -> bool {
        app.copy_state().addon.is_some()
    }

    #[test]
    fn test_start_previews_newest_match() {
        let app = app_with_buffer("gi");
        start_walk(&app, &["git status", "ls", "git commit", "echo gi"], "gi");

        assert!(active(&app));
        let pending = app.codearea().copy_state().pending;
        assert_eq!(
            pending,
            Pending {
                from: 2,
                to: 2,
                content: "t commit".to_string(),
            }
        );
    }

    #[test]
    fn test_start_without_walker_notifies_and_stays_inactive() {
        let notes = Arc::new(Mutex::new(Vec::new()));
        let sink = notes.clone();
        let app = App::new(AppSpec {
            notify: Some(Box::new(move |msg| sink.lock().unwrap().push(msg.to_string()))),
            ..Default::default()
        });

        start(&app, Config::default());

        assert_eq!(*notes.lock().unwrap(), vec!["no history walker".to_string()]);
        assert!(!active(&app));
        assert_eq!(prev(&app), Err(HistwalkError::Inactive));
    }

    #[test]
    fn test_start_with_no_matching_entry_stays_inactive() {
        let notes = Arc::new(Mutex::new(Vec::new()));
        let sink = notes.clone();
        let app = App::new(AppSpec {
            notify: Some(Box::new(move |msg| sink.lock().unwrap().push(msg.to_string()))),
            ..Default::default()
        });
        app.codearea().mutate(|s| s.buffer.insert_at_dot("xyz"));

        start_walk(&app, &["ls", "pwd"], "xyz");

        assert!(!active(&app));
        assert_eq!(
            *notes.lock().unwrap(),
            vec!["no matching history entry".to_string()]
        );
        assert_eq!(app.codearea().copy_state().pending, Pending::default());
    }

    #[test]
    fn test_prev_and_next_resync_preview() {
        let app = app_with_buffer("gi");
        start_walk(&app, &["git status", "ls", "git commit", "echo gi"], "gi");

        prev(&app).unwrap();
        assert_eq!(app.codearea().copy_state().pending.content, "t status");

        next(&app).unwrap();
        assert_eq!(app.codearea().copy_state().pending.content, "t commit");
    }

    #[test]
    fn test_exhaustion_keeps_preview_and_stays_active() {
        let app = app_with_buffer("gi");
        start_walk(&app, &["git status", "ls", "git commit"], "gi");

        // Already at the newest match; Next hits the boundary.
        assert_eq!(
            next(&app),
            Err(HistwalkError::Walk(WalkError::EndOfHistory))
        );
        assert_eq!(app.codearea().copy_state().pending.content, "t commit");
        assert!(active(&app));

        // Stepping still works after a failed step.
        prev(&app).unwrap();
        assert_eq!(app.codearea().copy_state().pending.content, "t status");
    }

    #[test]
    fn test_close_clears_preview_and_is_idempotent() {
        let app = app_with_buffer("gi");
        start_walk(&app, &["git status"], "gi");
        assert!(!app.codearea().copy_state().pending.is_noop());

        close(&app);
        assert!(!active(&app));
        assert_eq!(app.codearea().copy_state().pending, Pending::default());
        assert_eq!(app.codearea().copy_state().buffer.content, "gi");

        close(&app);
        assert!(!active(&app));
    }

    #[test]
    fn test_accept_commits_once_and_is_idempotent() {
        let app = app_with_buffer("gi");
        start_walk(&app, &["git status", "ls", "git commit", "echo gi"], "gi");

        prev(&app).unwrap();
        accept(&app);
        assert!(!active(&app));
        let state = app.codearea().copy_state();
        assert_eq!(state.buffer.content, "git status");
        assert_eq!(state.buffer.dot, 10);
        assert_eq!(state.pending, Pending::default());

        accept(&app);
        assert_eq!(app.codearea().copy_state().buffer.content, "git status");
    }

    #[test]
    fn test_prev_next_inactive_never_touch_pending() {
        let app = app_with_buffer("gi");

        assert_eq!(prev(&app), Err(HistwalkError::Inactive));
        assert_eq!(next(&app), Err(HistwalkError::Inactive));
        assert_eq!(app.codearea().copy_state().pending, Pending::default());
    }

    #[test]
    fn test_foreign_addon_is_left_untouched() {
        struct Other;

        impl Widget for Other {
            fn render(&self, width: usize, _height: usize) -> TextBuffer {
                TextBuffer::new(width)
            }
            fn handle(&self, _event: &Event) -> bool {
                false
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let app = app_with_buffer("gi");
        app.mutate_state(|s| s.addon = Some(Arc::new(Other)));

        assert_eq!(prev(&app), Err(HistwalkError::Inactive));
        close(&app);
        accept(&app);
        assert!(active(&app), "foreign addon still installed");
    }

    #[test]
    fn test_render_mode_line() {
        let app = app_with_buffer("gi");
        start_walk(&app, &["git status", "ls", "git commit"], "gi");

        let state = app.copy_state();
        let widget = state.addon.as_ref().unwrap();
        let buf = widget.render(40, 24);
        let line: String = buf.lines[0].iter().map(|cell| cell.ch).collect();
        assert_eq!(line, " HISTORY #2 ");
        assert_eq!(buf.lines[0][0].styles, vec![STYLE_MODE_LINE]);
        assert!(!widget.focus());

        // Height 0 renders nothing; narrow widths clip without failing.
        assert_eq!(widget.render(40, 0).line_count(), 0);
        assert_eq!(widget.render(4, 1).lines[0].len(), 4);
    }

    #[test]
    fn test_widget_delegates_unbound_input() {
        let app = app_with_buffer("gi");
        start_walk(&app, &["git status"], "gi");

        let state = app.copy_state();
        let widget = state.addon.as_ref().unwrap();
        assert!(!widget.handle(&Event::Key(Key::Up)));
    }

    #[test]
    fn test_widget_delegates_to_binding() {
        let app = app_with_buffer("gi");
        let binding = |event: &Event| matches!(event, Event::Key(Key::Up));
        let walker = PrefixWalker::new(entries(&["git status"]), "gi");
        start(
            &app,
            Config {
                binding: Some(Box::new(binding)),
                walker: Some(Box::new(walker)),
            },
        );

        let state = app.copy_state();
        let widget = state.addon.as_ref().unwrap();
        assert!(widget.handle(&Event::Key(Key::Up)));
        assert!(!widget.handle(&Event::Key(Key::Down)));
    }
}
