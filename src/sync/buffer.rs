//! # Deduplicating Merge Buffer
//!
//! The single, session-global collection of canonical messages. Every source
//! of records converges here: both live subscriptions, history pages, and
//! locally-originated optimistic writes. Insertion is idempotent on message
//! ID.
//!
//! Independent sources deliver out of arrival order (a history page can be
//! older than a live message), so the order invariant is restored with a
//! full stable re-sort after every mutation batch; conversations stay small,
//! tens to low hundreds of messages.

use crate::messaging::ChatMessage;

/// Ordered, deduplicated collection of canonical messages.
#[derive(Debug, Default)]
pub struct MergeBuffer {
    entries: Vec<ChatMessage>,
}

impl MergeBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a batch of records, then restore the order invariant.
    ///
    /// A record whose ID is already present updates the existing entry's
    /// status in place (last write wins); other fields stay as first
    /// observed. New IDs are appended.
    pub fn upsert_all(&mut self, records: impl IntoIterator<Item = ChatMessage>) {
        for record in records {
            self.merge(record);
        }
        self.resort();
    }

    /// Merge a single record; same contract as [`upsert_all`](Self::upsert_all).
    pub fn upsert_one(&mut self, record: ChatMessage) {
        self.merge(record);
        self.resort();
    }

    /// Empty the buffer. Used on sign-out and on peer-switch teardown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The current ordered sequence.
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.entries
    }

    /// Look up a message by ID.
    pub fn get(&self, id: &str) -> Option<&ChatMessage> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Number of messages held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the buffer holds no messages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn merge(&mut self, record: ChatMessage) {
        match self.entries.iter_mut().find(|entry| entry.id == record.id) {
            Some(existing) => existing.status = record.status,
            None => self.entries.push(record),
        }
    }

    fn resort(&mut self) {
        // Stable: equal timestamps keep their relative insertion order.
        self.entries.sort_by_key(|entry| entry.timestamp);
    }
}
