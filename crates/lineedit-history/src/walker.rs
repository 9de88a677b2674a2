//! Prefix-filtered history walking.
//!
//! A walker is a sequential cursor over the history entries that share a
//! fixed prefix, stepping from newer to older entries and back. The prefix is
//! established when the walk starts and never changes during one session.

use std::collections::HashSet;

use thiserror::Error;

use crate::store::Entry;

/// Errors reported by walker step operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WalkError {
    /// The walk reached the boundary of matching history.
    #[error("end of history")]
    EndOfHistory,
}

/// Sequential cursor over history entries filtered by a fixed prefix.
///
/// Contract: every command yielded through [`current`](Walker::current)
/// starts with [`prefix`](Walker::prefix), and the prefix never changes
/// during a walk. A failed step leaves the cursor where it was.
pub trait Walker: Send {
    /// The search prefix fixed at walk start.
    fn prefix(&self) -> &str;

    /// The entry the walk currently rests on; `None` before the first
    /// successful step.
    fn current(&self) -> Option<&Entry>;

    /// Step to the next older matching entry.
    fn prev(&mut self) -> Result<(), WalkError>;

    /// Step to the next newer matching entry.
    fn next(&mut self) -> Result<(), WalkError>;
}

/// A [`Walker`] over a snapshot of history entries.
///
/// Candidates are the entries whose command starts with the prefix, visited
/// newest first. Identical command texts are visited once, at their most
/// recent occurrence.
#[derive(Debug)]
pub struct PrefixWalker {
    prefix: String,
    /// Matching entries, newest first.
    matches: Vec<Entry>,
    /// Index into `matches`; `None` before the first step.
    pos: Option<usize>,
}

impl PrefixWalker {
    /// Build a walker over `entries` (oldest first) for `prefix`.
    pub fn new(entries: Vec<Entry>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let mut seen = HashSet::new();
        let matches = entries
            .into_iter()
            .rev()
            .filter(|entry| entry.cmd.starts_with(&prefix))
            .filter(|entry| seen.insert(entry.cmd.clone()))
            .collect();
        Self {
            prefix,
            matches,
            pos: None,
        }
    }
}

impl Walker for PrefixWalker {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn current(&self) -> Option<&Entry> {
        self.pos.and_then(|pos| self.matches.get(pos))
    }

    fn prev(&mut self) -> Result<(), WalkError> {
        let next_pos = match self.pos {
            None => 0,
            Some(pos) => pos + 1,
        };
        if next_pos >= self.matches.len() {
            return Err(WalkError::EndOfHistory);
        }
        self.pos = Some(next_pos);
        Ok(())
    }

    fn next(&mut self) -> Result<(), WalkError> {
        match self.pos {
            Some(pos) if pos > 0 => {
                self.pos = Some(pos - 1);
                Ok(())
            }
            _ => Err(WalkError::EndOfHistory),
        }
    }
}
