//! Message Normalization
//!
//! Maps the two raw document shapes the remote store can return into the
//! canonical [`ChatMessage`]. Historical documents use the legacy field names
//! (`sender` / `receiverId` / `text`); current documents use
//! (`from_user_id` / `to_user_id` / `content`). Both must be accepted on
//! every read path.
//!
//! Normalization is a pure transform: a record that cannot be resolved is
//! reported as [`ParseOutcome::Unparseable`] and logged, never propagated as
//! an error past this boundary.

use serde_json::Value;
use tracing::warn;

use super::message::{ChatMessage, MessageStatus};

/// One raw document as delivered by the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Store-generated document identifier
    pub id: String,
    /// Document fields, shape unknown until parsed
    pub fields: Value,
}

impl RawRecord {
    /// Pair a document ID with its fields.
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Result of normalizing a single raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The record resolved to a canonical message
    Parsed(ChatMessage),
    /// Required fields could not be resolved under either schema
    Unparseable,
}

impl ParseOutcome {
    /// The parsed message, if any.
    pub fn into_message(self) -> Option<ChatMessage> {
        match self {
            ParseOutcome::Parsed(message) => Some(message),
            ParseOutcome::Unparseable => None,
        }
    }
}

/// Normalize one raw record.
///
/// The current schema is attempted first, then the legacy schema. A record
/// is unparseable when the document ID is empty or neither schema resolves
/// both participant fields to non-empty strings. `content` defaults to the
/// empty string and `timestamp` to `0`.
pub fn normalize_record(record: &RawRecord) -> ParseOutcome {
    if record.id.is_empty() {
        warn!("dropping record with empty document id");
        return ParseOutcome::Unparseable;
    }

    let Some(fields) = record.fields.as_object() else {
        warn!(id = %record.id, "dropping record with non-object fields");
        return ParseOutcome::Unparseable;
    };

    let participants = resolve_str(fields, "from_user_id")
        .zip(resolve_str(fields, "to_user_id"))
        .map(|(from, to)| (from, to, "content"))
        .or_else(|| {
            resolve_str(fields, "sender")
                .zip(resolve_str(fields, "receiverId"))
                .map(|(from, to)| (from, to, "text"))
        });

    let Some((from, to, content_key)) = participants else {
        warn!(id = %record.id, "dropping record: participants unresolved under both schemas");
        return ParseOutcome::Unparseable;
    };

    let content = fields
        .get(content_key)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let timestamp = fields
        .get("timestamp")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let status = MessageStatus::from_raw(fields.get("status").and_then(Value::as_str));

    ParseOutcome::Parsed(ChatMessage {
        id: record.id.clone(),
        from: from.to_string(),
        to: to.to_string(),
        content: content.to_string(),
        timestamp,
        status,
    })
}

/// Normalize a batch, dropping unparseable records.
pub fn normalize_batch(records: &[RawRecord]) -> Vec<ChatMessage> {
    records
        .iter()
        .filter_map(|record| normalize_record(record).into_message())
        .collect()
}

fn resolve_str<'a>(fields: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
