//! Engine Event Stream
//!
//! Events broadcast by the sync engine so the UI layer can surface connection
//! state and failures (error banners, retry affordances) without reaching
//! into engine internals.

use serde::{Deserialize, Serialize};

/// Which live subscription a stream event refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StreamSide {
    /// Documents where the signed-in user is the sender
    Sent,
    /// Documents where the signed-in user is the receiver
    Received,
}

/// Observability events emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Live subscriptions are established for the signed-in user
    Connected { user_id: String },
    /// Subscriptions are torn down (sign-out)
    Disconnected,
    /// A live subscription could not be established or was lost.
    /// The engine does not retry; the view is frozen until the next
    /// sign-in or peer switch.
    StreamError { side: StreamSide, detail: String },
    /// The remote write for an optimistically-inserted message failed.
    /// The local entry is retained.
    SendFailed { message_id: String, detail: String },
    /// The remote status update failed; local status is retained.
    StatusUpdateFailed { message_id: String, detail: String },
}
