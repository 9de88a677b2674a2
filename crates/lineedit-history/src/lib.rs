#![warn(missing_docs)]
//! History store, prefix walker, and the history-walk addon for
//! `lineedit-core`.
//!
//! # Overview
//!
//! This crate supplies the history side of the line editor:
//!
//! - [`store`] - an append-only in-memory command history with monotonic
//!   sequence numbers
//! - [`walker`] - the [`Walker`] cursor contract over prefix-filtered history
//!   and its snapshot implementation [`PrefixWalker`]
//! - [`histwalk`] - the transient overlay addon that previews walked entries
//!   in the code area and commits or discards them
//!
//! # Quick Start
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
//! store.add_cmd("git commit");
//!
//! let walker = PrefixWalker::new(store.cmds().to_vec(), "gi");
//! histwalk::start(&app, Config {
//!     walker: Some(Box::new(walker)),
//!     ..Default::default()
//! });
//!
//! // The newest matching entry is previewed without touching the buffer.
//! let state = app.codearea().copy_state();
//! assert_eq!(state.buffer.content, "gi");
//! assert_eq!(state.pending.content, "t commit");
//! ```

pub mod histwalk;
pub mod store;
pub mod walker;

pub use histwalk::{Config, HistwalkError, HistwalkWidget};
pub use store::{Entry, MemStore};
pub use walker::{PrefixWalker, WalkError, Walker};
