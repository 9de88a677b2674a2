//! Code-area state: the edit buffer, the cursor ("dot"), and the pending
//! preview.
//!
//! # Overview
//!
//! The code area is the editable line of the editor. Its state is guarded by a
//! [`CodeArea`] handle exposing the scoped accessor contract: `mutate` applies
//! a closure under the state lock, `copy_state` returns a snapshot. All
//! offsets are byte offsets into the buffer content and must lie on `char`
//! boundaries.
//!
//! The [`Pending`] field is a proposed byte-range replacement that is shown to
//! the user but is not part of the committed content until
//! [`CodeAreaState::apply_pending`] runs. Overlays write it; only the code
//! area itself reads it back.

use std::sync::{Arc, Mutex, PoisonError};

use unicode_segmentation::UnicodeSegmentation;

use crate::render::{BufferBuilder, STYLE_PENDING, STYLE_PROMPT, TextBuffer};
use crate::term::{Event, Key};

/// The committed text of the edit buffer plus the cursor ("dot").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBuffer {
    /// Buffer text.
    pub content: String,
    /// Byte offset of the cursor; always on a `char` boundary.
    pub dot: usize,
}

impl CodeBuffer {
    /// Insert `text` at the dot and move the dot past it.
    pub fn insert_at_dot(&mut self, text: &str) {
        self.content.insert_str(self.dot, text);
        self.dot += text.len();
    }

    /// Byte offset of the grapheme boundary left of the dot.
    pub fn dot_left(&self) -> usize {
        self.content[..self.dot]
            .grapheme_indices(true)
            .last()
            .map(|(offset, _)| offset)
            .unwrap_or(0)
    }

    /// Byte offset of the grapheme boundary right of the dot.
    pub fn dot_right(&self) -> usize {
        self.content[self.dot..]
            .graphemes(true)
            .next()
            .map(|grapheme| self.dot + grapheme.len())
            .unwrap_or(self.content.len())
    }
}

/// A proposed byte-range replacement that has not been committed yet.
///
/// Reads as "if accepted, replace `content[from..to]` with `content`". The
/// default value is the empty pending, which describes no change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pending {
    /// Start byte offset of the replaced span.
    pub from: usize,
    /// End byte offset (exclusive) of the replaced span.
    pub to: usize,
    /// Replacement text.
    pub content: String,
}

impl Pending {
    /// Whether this pending describes no change at all.
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.content.is_empty()
    }
}

/// Mutable state of a code area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeAreaState {
    /// The committed buffer.
    pub buffer: CodeBuffer,
    /// The pending preview overlaying the buffer.
    pub pending: Pending,
}

impl CodeAreaState {
    /// Commit the pending span into the buffer content.
    ///
    /// Replaces `content[from..to]` with the pending text, moves the dot to
    /// the end of the spliced text, and resets the pending to empty. Span
    /// offsets are clamped to the content length; committing an empty pending
    /// is a no-op.
    pub fn apply_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_noop() {
            return;
        }
        let len = self.buffer.content.len();
        let from = pending.from.min(len);
        let to = pending.to.clamp(from, len);
        self.buffer.content.replace_range(from..to, &pending.content);
        self.buffer.dot = from + pending.content.len();
    }
}

struct CodeAreaInner {
    prompt: String,
    state: Mutex<CodeAreaState>,
}

/// Shared handle to a code area, with the scoped mutate/copy accessor
/// contract.
///
/// Clones share the same underlying state.
#[derive(Clone)]
pub struct CodeArea {
    inner: Arc<CodeAreaInner>,
}

impl Default for CodeArea {
    fn default() -> Self {
        Self::new("")
    }
}

impl CodeArea {
    /// Create a code area with the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CodeAreaInner {
                prompt: prompt.into(),
                state: Mutex::new(CodeAreaState::default()),
            }),
        }
    }

    /// Apply `f` to the state under the state lock.
    ///
    /// `f` must not call back into this handle.
    pub fn mutate(&self, f: impl FnOnce(&mut CodeAreaState)) {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    /// Return a snapshot of the state.
    pub fn copy_state(&self) -> CodeAreaState {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Default editing behavior for events not consumed by an addon.
    ///
    /// Covers printable input, paste, Backspace/Delete (grapheme-aware), and
    /// Left/Right/Home/End dot motion. Returns `true` when the event was
    /// handled.
    pub fn handle_default(&self, event: &Event) -> bool {
        match event {
            Event::Key(Key::Char(ch)) => {
                let mut text = [0u8; 4];
                let text = ch.encode_utf8(&mut text);
                self.mutate(|s| s.buffer.insert_at_dot(text));
                true
            }
            Event::Paste(text) => {
                self.mutate(|s| s.buffer.insert_at_dot(text));
                true
            }
            Event::Key(Key::Backspace) => {
                self.mutate(|s| {
                    let left = s.buffer.dot_left();
                    s.buffer.content.replace_range(left..s.buffer.dot, "");
                    s.buffer.dot = left;
                });
                true
            }
            Event::Key(Key::Delete) => {
                self.mutate(|s| {
                    let right = s.buffer.dot_right();
                    s.buffer.content.replace_range(s.buffer.dot..right, "");
                });
                true
            }
            Event::Key(Key::Left) => {
                self.mutate(|s| s.buffer.dot = s.buffer.dot_left());
                true
            }
            Event::Key(Key::Right) => {
                self.mutate(|s| s.buffer.dot = s.buffer.dot_right());
                true
            }
            Event::Key(Key::Home) => {
                self.mutate(|s| s.buffer.dot = 0);
                true
            }
            Event::Key(Key::End) => {
                self.mutate(|s| s.buffer.dot = s.buffer.content.len());
                true
            }
            _ => false,
        }
    }

    /// Render the prompt and the buffer, with the pending span spliced in and
    /// styled.
    ///
    /// While a pending preview is shown the dot sits at the end of the
    /// replacement text; otherwise it reflects the buffer dot. The result is
    /// trimmed to at most `height` lines.
    pub fn render(&self, width: usize, height: usize) -> TextBuffer {
        let CodeAreaState { buffer, pending } = self.copy_state();
        let len = buffer.content.len();
        let from = pending.from.min(len);
        let to = pending.to.clamp(from, len);

        let builder = BufferBuilder::new(width).write_str(&self.inner.prompt, &[STYLE_PROMPT]);
        let builder = if pending.is_noop() {
            let dot = buffer.dot.min(len);
            builder
                .write_str(&buffer.content[..dot], &[])
                .set_dot_here()
                .write_str(&buffer.content[dot..], &[])
        } else {
            builder
                .write_str(&buffer.content[..from], &[])
                .write_str(&pending.content, &[STYLE_PENDING])
                .set_dot_here()
                .write_str(&buffer.content[to..], &[])
        };

        let mut buf = builder.buffer();
        buf.trim_to_lines(0, height);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Pos;
    use pretty_assertions::assert_eq;

    fn line_text(buf: &TextBuffer, line: usize) -> String {
        buf.lines[line].iter().map(|cell| cell.ch).collect()
    }

    #[test]
    fn test_insert_at_dot() {
        let mut buffer = CodeBuffer::default();
        buffer.insert_at_dot("echo");
        buffer.dot = 0;
        buffer.insert_at_dot("$ ");

        assert_eq!(buffer.content, "$ echo");
        assert_eq!(buffer.dot, 2);
    }

    #[test]
    fn test_dot_motion_is_grapheme_aware() {
        let buffer = CodeBuffer {
            content: "aé́b".to_string(), // 'e' + combining marks form one grapheme
            dot: 1,
        };

        let right = buffer.dot_right();
        assert!(right > 2, "combining sequence stepped over as one unit");
        let back = CodeBuffer {
            content: buffer.content.clone(),
            dot: right,
        };
        assert_eq!(back.dot_left(), 1);
    }

    #[test]
    fn test_apply_pending_replaces_span_and_moves_dot() {
        let mut state = CodeAreaState {
            buffer: CodeBuffer {
                content: "gi".to_string(),
                dot: 2,
            },
            pending: Pending {
                from: 2,
                to: 2,
                content: "t status".to_string(),
            },
        };

        state.apply_pending();
        assert_eq!(state.buffer.content, "git status");
        assert_eq!(state.buffer.dot, 10);
        assert_eq!(state.pending, Pending::default());
    }

    #[test]
    fn test_apply_pending_noop() {
        let mut state = CodeAreaState {
            buffer: CodeBuffer {
                content: "abc".to_string(),
                dot: 1,
            },
            pending: Pending::default(),
        };

        state.apply_pending();
        assert_eq!(state.buffer.content, "abc");
        assert_eq!(state.buffer.dot, 1);
    }

    #[test]
    fn test_apply_pending_clamps_out_of_range_span() {
        let mut state = CodeAreaState {
            buffer: CodeBuffer {
                content: "ab".to_string(),
                dot: 0,
            },
            pending: Pending {
                from: 1,
                to: 99,
                content: "X".to_string(),
            },
        };

        state.apply_pending();
        assert_eq!(state.buffer.content, "aX");
        assert_eq!(state.buffer.dot, 2);
    }

    #[test]
    fn test_handle_default_editing() {
        let codearea = CodeArea::new("");
        codearea.handle_default(&Event::Key(Key::Char('a')));
        codearea.handle_default(&Event::Key(Key::Char('b')));
        codearea.handle_default(&Event::Key(Key::Left));
        codearea.handle_default(&Event::Key(Key::Char('x')));
        assert_eq!(codearea.copy_state().buffer.content, "axb");

        codearea.handle_default(&Event::Key(Key::Backspace));
        assert_eq!(codearea.copy_state().buffer.content, "ab");

        codearea.handle_default(&Event::Key(Key::Home));
        codearea.handle_default(&Event::Key(Key::Delete));
        assert_eq!(codearea.copy_state().buffer.content, "b");

        assert!(!codearea.handle_default(&Event::Key(Key::Up)));
    }

    #[test]
    fn test_render_without_pending_places_dot_at_buffer_dot() {
        let codearea = CodeArea::new("> ");
        codearea.mutate(|s| {
            s.buffer.insert_at_dot("ab");
            s.buffer.dot = 1;
        });

        let buf = codearea.render(80, 24);
        assert_eq!(line_text(&buf, 0), "> ab");
        assert_eq!(buf.dot, Some(Pos { line: 0, col: 3 }));
        assert_eq!(buf.lines[0][0].styles, vec![STYLE_PROMPT]);
    }

    #[test]
    fn test_render_pending_is_styled_and_holds_dot() {
        let codearea = CodeArea::new("");
        codearea.mutate(|s| {
            s.buffer.insert_at_dot("gi");
            s.pending = Pending {
                from: 2,
                to: 2,
                content: "t status".to_string(),
            };
        });

        let buf = codearea.render(80, 24);
        assert_eq!(line_text(&buf, 0), "git status");
        assert_eq!(buf.lines[0][1].styles, Vec::<u32>::new());
        assert_eq!(buf.lines[0][2].styles, vec![STYLE_PENDING]);
        assert_eq!(buf.dot, Some(Pos { line: 0, col: 10 }));
    }

    #[test]
    fn test_render_trims_to_height() {
        let codearea = CodeArea::new("");
        codearea.mutate(|s| s.buffer.insert_at_dot("aaaabbbb"));

        let buf = codearea.render(4, 1);
        assert_eq!(buf.line_count(), 1);
        assert_eq!(line_text(&buf, 0), "aaaa");

        let empty = codearea.render(4, 0);
        assert_eq!(empty.line_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let codearea = CodeArea::new("");
        let other = codearea.clone();
        codearea.mutate(|s| s.buffer.insert_at_dot("shared"));
        assert_eq!(other.copy_state().buffer.content, "shared");
    }
}
