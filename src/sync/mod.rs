//! # Sync Module
//!
//! The message synchronization and reconciliation engine: a local,
//! deduplicated, time-ordered view of each two-party conversation, fed by
//! two independently-arriving live update streams, paginated history loads,
//! and locally-originated optimistic writes.
//!
//! ## Key Components
//!
//! - `buffer` - The deduplicating, timestamp-ordered merge buffer
//! - `projection` - The pure per-peer conversation view derivation
//! - `engine` - [`ChatEngine`], the facade owning all mutable sync state
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trekchat::messaging::ChatUser;
//! use trekchat::store::InMemoryStore;
//! use trekchat::sync::ChatEngine;
//!
//! # async fn example() {
//! let engine = ChatEngine::new(InMemoryStore::new());
//! engine.sign_in(ChatUser::new("u1", "Me")).await;
//! engine.set_active_peer(ChatUser::new("u2", "Agency")).await;
//!
//! let view = engine.conversation_view();
//! let sent = engine.send_message("u2", "Is the March departure still open?").await;
//! assert!(sent.is_some());
//! assert!(!view.borrow().is_empty());
//! # }
//! ```

pub mod buffer;
pub mod engine;
mod listener;
pub mod projection;

pub use buffer::MergeBuffer;
pub use engine::ChatEngine;
pub use projection::project;
