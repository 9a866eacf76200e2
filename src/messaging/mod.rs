//! Messaging Module
//!
//! Data structures for the chat core:
//!
//! - `ChatMessage` - The canonical message representation
//! - `ChatUser` - A chat participant
//! - `ChatEvent` - Observability events emitted by the engine
//! - `normalize` - Raw-record-to-canonical normalization
//!
//! # Usage
//!
//! ```rust
//! use trekchat::messaging::{ChatMessage, ChatUser, MessageStatus};
//! ```

pub mod event;
pub mod message;
pub mod normalize;
pub mod user;

// Re-export all types
pub use event::{ChatEvent, StreamSide};
pub use message::{ChatMessage, MessageStatus};
pub use normalize::{normalize_batch, normalize_record, ParseOutcome, RawRecord};
pub use user::ChatUser;
