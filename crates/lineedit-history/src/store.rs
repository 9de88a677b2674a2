//! In-memory command history.

/// One stored command with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Monotonic identifier of the entry within its store.
    pub seq: u64,
    /// The command text.
    pub cmd: String,
}

/// Append-only in-memory history store.
///
/// Sequence numbers are assigned consecutively from 0; repeated identical
/// commands still get fresh sequence numbers.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command, returning its sequence number.
    pub fn add_cmd(&mut self, cmd: impl Into<String>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            seq,
            cmd: cmd.into(),
        });
        seq
    }

    /// All stored entries, oldest first.
    pub fn cmds(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
