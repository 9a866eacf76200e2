//! Conversation View Projection
//!
//! Pure derivation of the per-conversation message list from the global
//! merge buffer and the active peer. The engine recomputes this after every
//! buffer mutation or peer change and publishes it over a watch channel;
//! nothing else may produce the view.

use crate::messaging::{ChatMessage, ChatUser};

use super::buffer::MergeBuffer;

/// Messages involving the active peer, in buffer order.
///
/// With no active peer the view is empty, never the unfiltered buffer.
pub fn project(buffer: &MergeBuffer, active_peer: Option<&ChatUser>) -> Vec<ChatMessage> {
    match active_peer {
        Some(peer) => buffer
            .snapshot()
            .iter()
            .filter(|message| message.involves(&peer.id))
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, from: &str, to: &str, ts: i64) -> ChatMessage {
        ChatMessage::new(id, from, to, "hi", ts)
    }

    fn buffer_with(messages: Vec<ChatMessage>) -> MergeBuffer {
        let mut buffer = MergeBuffer::new();
        buffer.upsert_all(messages);
        buffer
    }

    #[test]
    fn test_peer_isolation() {
        let buffer = buffer_with(vec![
            msg("m1", "u1", "u2", 10),
            msg("m2", "u2", "u1", 20),
            msg("m3", "u3", "u4", 30),
        ]);
        let peer = ChatUser::new("u2", "Peer");

        let view = project(&buffer, Some(&peer));
        let ids: Vec<&str> = view.iter().map(|message| message.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
    }

    #[test]
    fn test_no_peer_yields_empty_view() {
        let buffer = buffer_with(vec![msg("m1", "u1", "u2", 10)]);
        assert!(project(&buffer, None).is_empty());
    }

    #[test]
    fn test_view_preserves_buffer_order() {
        let buffer = buffer_with(vec![
            msg("m2", "u2", "u1", 20),
            msg("m1", "u1", "u2", 10),
            msg("m3", "u1", "u2", 30),
        ]);
        let peer = ChatUser::new("u2", "Peer");

        let view = project(&buffer, Some(&peer));
        let timestamps: Vec<i64> = view.iter().map(|message| message.timestamp).collect();
        assert_eq!(timestamps, vec![10, 20, 30]);
    }
}
