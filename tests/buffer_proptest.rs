//! Property-based tests for the merge buffer
//!
//! Uses proptest to generate arbitrary upsert interleavings and verify the
//! ordering and deduplication invariants hold under all of them.

use std::collections::HashMap;

use proptest::prelude::*;
use trekchat::messaging::{ChatMessage, MessageStatus};
use trekchat::sync::MergeBuffer;

fn status(delivered: bool) -> MessageStatus {
    if delivered {
        MessageStatus::Delivered
    } else {
        MessageStatus::Sent
    }
}

/// One upsert operation: a message drawn from a small id space so collisions
/// are frequent.
fn op_strategy() -> impl Strategy<Value = (u8, i64, bool)> {
    (0u8..8, 0i64..1_000, any::<bool>())
}

proptest! {
    #[test]
    fn snapshot_is_always_sorted_by_timestamp(
        ops in proptest::collection::vec(op_strategy(), 0..64),
        chunk_size in 1usize..5,
    ) {
        let mut buffer = MergeBuffer::new();
        for chunk in ops.chunks(chunk_size) {
            let batch: Vec<ChatMessage> = chunk
                .iter()
                .map(|&(id, ts, delivered)| {
                    ChatMessage::new(format!("m{}", id), "u1", "u2", "x", ts)
                        .with_status(status(delivered))
                })
                .collect();
            buffer.upsert_all(batch);

            let timestamps: Vec<i64> =
                buffer.snapshot().iter().map(|m| m.timestamp).collect();
            let mut sorted = timestamps.clone();
            sorted.sort();
            prop_assert_eq!(&timestamps, &sorted);
        }
    }

    #[test]
    fn ids_stay_unique_and_last_status_wins(
        ops in proptest::collection::vec(op_strategy(), 0..64),
        chunk_size in 1usize..5,
    ) {
        let mut buffer = MergeBuffer::new();
        let mut last_status: HashMap<String, MessageStatus> = HashMap::new();
        let mut first_timestamp: HashMap<String, i64> = HashMap::new();

        for chunk in ops.chunks(chunk_size) {
            let batch: Vec<ChatMessage> = chunk
                .iter()
                .map(|&(id, ts, delivered)| {
                    let id = format!("m{}", id);
                    last_status.insert(id.clone(), status(delivered));
                    first_timestamp.entry(id.clone()).or_insert(ts);
                    ChatMessage::new(id, "u1", "u2", "x", ts).with_status(status(delivered))
                })
                .collect();
            buffer.upsert_all(batch);
        }

        prop_assert_eq!(buffer.len(), last_status.len());
        for message in buffer.snapshot() {
            // Exactly one entry per id
            prop_assert_eq!(
                buffer.snapshot().iter().filter(|m| m.id == message.id).count(),
                1
            );
            // Status reflects the most recently applied record
            prop_assert_eq!(message.status, last_status[&message.id]);
            // Non-status fields stay as first observed
            prop_assert_eq!(message.timestamp, first_timestamp[&message.id]);
        }
    }

    #[test]
    fn clear_always_empties(ops in proptest::collection::vec(op_strategy(), 0..32)) {
        let mut buffer = MergeBuffer::new();
        let batch: Vec<ChatMessage> = ops
            .iter()
            .map(|&(id, ts, delivered)| {
                ChatMessage::new(format!("m{}", id), "u1", "u2", "x", ts)
                    .with_status(status(delivered))
            })
            .collect();
        buffer.upsert_all(batch);
        buffer.clear();
        prop_assert!(buffer.is_empty());
    }
}
