//! Chat Message Data Structure
//!
//! The one canonical in-memory message representation. Every raw record shape
//! the remote store can hand us is normalized into this type before it
//! reaches the merge buffer.

use serde::{Deserialize, Serialize};

/// Delivery status of a message.
///
/// The remote store's raw vocabulary also contains `"read"`, which this
/// client presents identically to `"delivered"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    /// Written locally or to the store, not yet acknowledged by the peer
    Sent,
    /// Acknowledged by the peer (raw `delivered` or `read`)
    Delivered,
}

impl Default for MessageStatus {
    fn default() -> Self {
        MessageStatus::Sent
    }
}

impl MessageStatus {
    /// Map a raw status string from either store schema.
    ///
    /// `"delivered"` and `"read"` both map to `Delivered`; anything else,
    /// including an absent field, is `Sent`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("delivered") => MessageStatus::Delivered,
            Some("read") => MessageStatus::Delivered,
            _ => MessageStatus::Sent,
        }
    }

    /// Convert to the string the store's status-update field expects.
    pub fn as_raw(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
        }
    }
}

/// Represents a chat message between two participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Unique message ID, stable across normalization from any source schema
    pub id: String,
    /// Sender user ID
    pub from: String,
    /// Receiver user ID
    pub to: String,
    /// Message text
    pub content: String,
    /// Send time in epoch milliseconds; the sole sort key
    pub timestamp: i64,
    /// Delivery status
    #[serde(default)]
    pub status: MessageStatus,
}

impl ChatMessage {
    /// Create a freshly sent message.
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        content: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            content: content.into(),
            timestamp,
            status: MessageStatus::Sent,
        }
    }

    /// Copy of this message with a different status.
    pub fn with_status(&self, status: MessageStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Whether `user_id` is the sender or the receiver.
    pub fn involves(&self, user_id: &str) -> bool {
        self.from == user_id || self.to == user_id
    }

    /// Get a preview of the message (first N characters).
    pub fn preview(&self, max_len: usize) -> String {
        if self.content.chars().count() <= max_len {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_raw() {
        assert_eq!(MessageStatus::from_raw(Some("delivered")), MessageStatus::Delivered);
        assert_eq!(MessageStatus::from_raw(Some("read")), MessageStatus::Delivered);
        assert_eq!(MessageStatus::from_raw(Some("sent")), MessageStatus::Sent);
        assert_eq!(MessageStatus::from_raw(Some("garbage")), MessageStatus::Sent);
        assert_eq!(MessageStatus::from_raw(None), MessageStatus::Sent);
    }

    #[test]
    fn test_with_status_keeps_identity() {
        let msg = ChatMessage::new("m1", "u1", "u2", "hello", 100);
        let delivered = msg.with_status(MessageStatus::Delivered);
        assert_eq!(delivered.id, msg.id);
        assert_eq!(delivered.timestamp, msg.timestamp);
        assert_eq!(delivered.status, MessageStatus::Delivered);
    }

    #[test]
    fn test_involves() {
        let msg = ChatMessage::new("m1", "u1", "u2", "hello", 100);
        assert!(msg.involves("u1"));
        assert!(msg.involves("u2"));
        assert!(!msg.involves("u3"));
    }

    #[test]
    fn test_preview_truncates() {
        let msg = ChatMessage::new("m1", "u1", "u2", "a rather long message body", 100);
        assert_eq!(msg.preview(10), "a rathe...");
        assert_eq!(msg.preview(100), "a rather long message body");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let msg = ChatMessage::new("m1", "u1", "u2", "hello", 100)
            .with_status(MessageStatus::Delivered);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"delivered\""));
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
