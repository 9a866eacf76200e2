//! TrekChat - Message Sync Core
//!
//! TrekChat is the message-synchronization core of a travel-marketplace chat
//! client: travelers browse packages in the app and chat with the agencies
//! behind them. This crate owns the hard part of that feature: keeping a
//! local, deduplicated, time-ordered view of each two-party conversation
//! consistent while records arrive from several untrusted sources at once.
//!
//! # Overview
//!
//! The backing document database pushes updates over two independent live
//! subscriptions (one per direction of the conversation), history arrives in
//! descending pages on demand, and sends are inserted optimistically before
//! the remote write round-trips. All of these converge on one global merge
//! buffer that deduplicates by message ID and re-sorts by timestamp, and the
//! UI observes only the per-peer projection of that buffer.
//!
//! # Module Structure
//!
//! - **`messaging`** - Canonical message/participant types, the engine event
//!   stream, and the dual-schema record normalizer
//! - **`store`** - The remote document-database boundary (trait plus an
//!   in-memory implementation for tests and demos)
//! - **`sync`** - The reconciliation engine: merge buffer, conversation view
//!   projection, dual-stream listener lifecycle, send/status mediation, and
//!   history paging
//! - **`config`** - Engine tunables with a builder
//! - **`error`** - Engine-level error types
//!
//! # Usage
//!
//! ```rust,no_run
//! use trekchat::messaging::ChatUser;
//! use trekchat::store::InMemoryStore;
//! use trekchat::ChatEngine;
//!
//! # async fn example() {
//! let engine = ChatEngine::new(InMemoryStore::new());
//!
//! // Auth layer reports a signed-in user; both live streams connect.
//! engine.sign_in(ChatUser::new("traveler-17", "Priya")).await;
//!
//! // The UI opens a conversation and observes its reactive view.
//! engine.set_active_peer(ChatUser::new("agency-4", "Summit Treks")).await;
//! let view = engine.conversation_view();
//!
//! let sent = engine.send_message("agency-4", "Is the March departure still open?").await;
//! assert!(sent.is_some());
//! assert!(!view.borrow().is_empty());
//!
//! let _ = engine.load_history("agency-4", None).await;
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The merge buffer has exactly one owner: every mutation serializes through
//! the engine's state lock, listener batches are fenced by a generation
//! epoch, and the UI layer only ever sees watch-channel snapshots.
//!
//! # Error Handling
//!
//! Reconciliation paths deliberately degrade instead of failing: malformed
//! records are dropped and logged, a lost subscription freezes the view
//! until the next sign-in or peer switch, and a failed send keeps its
//! optimistic entry. Failures are reported through `tracing` and the
//! [`messaging::ChatEvent`] broadcast; see `error` for the few operations
//! that return `Result`.

/// Engine configuration
pub mod config;

/// Engine-level error types
pub mod error;

/// Messaging types and normalization
pub mod messaging;

/// Remote store boundary
pub mod store;

/// Reconciliation engine
pub mod sync;

/// Re-export commonly used types for convenience
pub use config::{ChatConfig, ChatConfigBuilder, ConfigError};
pub use error::{ChatError, Result};
pub use messaging::{ChatEvent, ChatMessage, ChatUser, MessageStatus};
pub use store::{InMemoryStore, MessageStore};
pub use sync::ChatEngine;
