//! # Remote Store Boundary
//!
//! The chat core treats the backing document database as an external
//! collaborator reached through the [`MessageStore`] trait: two live
//! subscriptions (one per direction of the conversation), a create-or-
//! overwrite write, a partial status update, and a paginated history query.
//!
//! Subscriptions are established synchronously and hand back a channel of
//! raw document batches; all I/O waiting happens on the channel, never while
//! holding engine state.
//!
//! Writes use one schema only (the legacy field names the production backend
//! still stores); reads must tolerate both that shape and the current one,
//! which is the normalizer's job, not the store's.

pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::messaging::RawRecord;

pub use memory::InMemoryStore;

/// One update pushed by a live subscription: the documents added or changed
/// since the previous push. A fresh subscription's first batch is the full
/// matching snapshot.
pub type RecordBatch = Vec<RawRecord>;

/// Errors raised at the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A live subscription could not be established
    #[error("subscribe failed: {0}")]
    Subscribe(String),

    /// A document write or update failed
    #[error("write failed: {0}")]
    Write(String),

    /// A history query failed
    #[error("query failed: {0}")]
    Query(String),

    /// A payload could not be serialized for the store
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// The write-path document shape.
///
/// Serializes to the field names the backend actually stores, so a written
/// document reads back through the legacy arm of the normalizer.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageWrite {
    /// Sender user ID
    pub sender: String,
    /// Receiver user ID
    #[serde(rename = "receiverId")]
    pub receiver_id: String,
    /// Message text
    pub text: String,
    /// Send time, epoch milliseconds
    pub timestamp: i64,
    /// Conversation key, `"{sender}_{receiver}"`
    #[serde(rename = "chatId")]
    pub chat_id: String,
}

impl MessageWrite {
    /// Build a write payload for one outgoing message.
    pub fn new(
        sender: impl Into<String>,
        receiver_id: impl Into<String>,
        text: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        let sender = sender.into();
        let receiver_id = receiver_id.into();
        let chat_id = format!("{}_{}", sender, receiver_id);
        Self {
            sender,
            receiver_id,
            text: text.into(),
            timestamp,
            chat_id,
        }
    }
}

/// Generic document database with listen/query/write capability.
///
/// Implementations must be cheap to share (`&self` methods) and safe to call
/// from concurrent tasks.
#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    /// Subscribe to documents where `user_id` is the sender.
    ///
    /// Returns the batch channel immediately; the first batch is the current
    /// snapshot. Dropping the receiver cancels the subscription.
    fn listen_sent(&self, user_id: &str) -> Result<mpsc::Receiver<RecordBatch>>;

    /// Subscribe to documents where `user_id` is the receiver.
    fn listen_received(&self, user_id: &str) -> Result<mpsc::Receiver<RecordBatch>>;

    /// Create-or-overwrite the document `id` with a message write.
    async fn create_message(&self, id: &str, write: &MessageWrite) -> Result<()>;

    /// Partial update of the `status` field of document `id`.
    async fn update_status(&self, id: &str, status: &str) -> Result<()>;

    /// Messages between `user_a` and `user_b`, ordered by `timestamp`
    /// descending, at most `limit` rows.
    async fn query_conversation(
        &self,
        user_a: &str,
        user_b: &str,
        limit: usize,
    ) -> Result<Vec<RawRecord>>;
}
