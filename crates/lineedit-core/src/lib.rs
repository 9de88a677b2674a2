#![warn(missing_docs)]
//! Lineedit Core - Headless Line-Editor Kernel
//!
//! # Overview
//!
//! `lineedit-core` is a headless kernel for an interactive line editor (a shell
//! read-line). It owns buffer state, the pending-edit preview, and the addon
//! slot, and leaves terminal I/O and concrete rendering to a frontend that
//! paints the "text grid" output.
//!
//! # Core Features
//!
//! - **Code-Area State**: edit buffer + cursor ("dot") with grapheme-aware motion
//! - **Pending Preview**: a non-committed byte-range replacement shown over the buffer
//! - **Addon Slot**: one transient overlay widget at a time, checked by concrete type
//! - **Scoped Accessors**: state mutation through `mutate`/`copy_state` critical sections
//! - **Headless Rendering**: styled-cell display buffers, width-aware (CJK wide chars)
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  App (state slot, notify, redraw, dispatch) │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Widget & Handler contracts                 │  ← Addon seam
//! ├─────────────────────────────────────────────┤
//! │  CodeArea (buffer, dot, pending preview)    │  ← Edit state
//! ├─────────────────────────────────────────────┤
//! │  Render (cells, buffers, builders)          │  ← Display data
//! ├─────────────────────────────────────────────┤
//! │  Term (decoded key events)                  │  ← Input data
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use lineedit_core::{App, AppSpec};
//! use lineedit_core::term::{Event, Key};
//!
//! let app = App::new(AppSpec::default());
//!
//! // Type two characters through the default editing path.
//! app.handle_event(&Event::Key(Key::Char('l')));
//! app.handle_event(&Event::Key(Key::Char('s')));
//!
//! let state = app.codearea().copy_state();
//! assert_eq!(state.buffer.content, "ls");
//! assert_eq!(state.buffer.dot, 2);
//! ```
//!
//! # Module Description
//!
//! - [`term`] - decoded terminal input events
//! - [`render`] - styled-cell display buffers for UI renderers
//! - [`widget`] - widget and input-handler contracts
//! - [`codearea`] - edit buffer state and the pending preview
//! - [`app`] - application state, addon slot, and host hooks

pub mod app;
pub mod codearea;
pub mod render;
pub mod term;
pub mod widget;

pub use app::{App, AppSpec, AppState, NotifyFn, RedrawFn};
pub use codearea::{CodeArea, CodeAreaState, CodeBuffer, Pending};
pub use render::{
    BufferBuilder, Cell, Pos, STYLE_MODE_LINE, STYLE_PENDING, STYLE_PROMPT, StyleId, TextBuffer,
};
pub use term::{Event, Key};
pub use widget::{DummyHandler, Handler, Widget};
