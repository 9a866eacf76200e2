//! Property-based tests for record normalization
//!
//! Uses proptest to verify the normalizer is total: any document either
//! resolves to a well-formed canonical message or is reported unparseable,
//! and the status vocabulary mapping holds for arbitrary inputs.

use proptest::prelude::*;
use serde_json::json;
use trekchat::messaging::{normalize_record, MessageStatus, ParseOutcome, RawRecord};

fn id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}"
}

proptest! {
    #[test]
    fn legacy_records_with_participants_always_parse(
        id in id_strategy(),
        from in id_strategy(),
        to in id_strategy(),
        text in ".*",
        ts in any::<i64>(),
    ) {
        let record = RawRecord::new(
            id.clone(),
            json!({
                "sender": from.clone(),
                "receiverId": to.clone(),
                "text": text.clone(),
                "timestamp": ts,
            }),
        );
        match normalize_record(&record) {
            ParseOutcome::Parsed(message) => {
                prop_assert_eq!(message.id, id);
                prop_assert_eq!(message.from, from);
                prop_assert_eq!(message.to, to);
                prop_assert_eq!(message.content, text);
                prop_assert_eq!(message.timestamp, ts);
            }
            ParseOutcome::Unparseable => prop_assert!(false, "record should parse"),
        }
    }

    #[test]
    fn status_mapping_is_total(
        id in id_strategy(),
        raw_status in prop_oneof![
            Just("delivered".to_string()),
            Just("read".to_string()),
            Just("sent".to_string()),
            ".*",
        ],
    ) {
        let record = RawRecord::new(
            id,
            json!({
                "from_user_id": "a",
                "to_user_id": "b",
                "content": "x",
                "timestamp": 1,
                "status": raw_status.clone(),
            }),
        );
        let expected = match raw_status.as_str() {
            "delivered" | "read" => MessageStatus::Delivered,
            _ => MessageStatus::Sent,
        };
        match normalize_record(&record) {
            ParseOutcome::Parsed(message) => prop_assert_eq!(message.status, expected),
            ParseOutcome::Unparseable => prop_assert!(false, "record should parse"),
        }
    }

    #[test]
    fn arbitrary_string_maps_never_panic(
        id in ".*",
        fields in proptest::collection::hash_map(".{0,16}", ".{0,16}", 0..8),
    ) {
        let value = serde_json::to_value(&fields).unwrap();
        let record = RawRecord::new(id, value);
        // Outcome is either variant; the property is totality.
        let _ = normalize_record(&record);
    }
}
