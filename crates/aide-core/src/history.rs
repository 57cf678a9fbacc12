use serde::{Deserialize, Serialize};

/// Number of turns a session keeps before the oldest are discarded.
///
/// Bounds both memory held by a long-lived session and the amount of prior
/// context replayed to the model on every request.
pub const MAX_HISTORY_LENGTH: usize = 20;

/// Who produced a turn. Maps onto the wire roles of the generative API
/// (`user` / `model`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
}

impl ConversationEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An append-only, insertion-ordered log of conversation turns, trimmed
/// from the oldest end once it grows past its capacity.
///
/// Invariant: `entries().len() <= capacity` after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    capacity: usize,
}

impl ConversationLog {
    /// A log with the canonical capacity of [`MAX_HISTORY_LENGTH`].
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_LENGTH)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Adds `entry` at the tail, then drops entries from the head until the
    /// capacity invariant holds again. Always succeeds.
    pub fn append(&mut self, entry: ConversationEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
    }

    /// Read-only snapshot in insertion order, oldest first.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears the log. Idempotent.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}
