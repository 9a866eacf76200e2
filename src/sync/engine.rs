//! # Chat Sync Engine
//!
//! The single owner of the reconciliation state: signed-in user, active
//! peer, merge buffer, listener epoch, and the running listener tasks. All
//! mutating operations (live-stream batches, sends, status updates, history
//! merges, lifecycle changes) serialize through one `RwLock` write guard,
//! which is the only concurrency control this design needs.
//!
//! The UI layer observes the engine through watch channels (conversation
//! view, online roster) and a broadcast event stream; it never touches the
//! buffer directly.

use std::sync::Arc;

use tokio::sync::{broadcast, watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::ChatConfig;
use crate::error::{ChatError, Result};
use crate::messaging::{
    normalize_batch, ChatEvent, ChatMessage, ChatUser, MessageStatus, StreamSide,
};
use crate::store::{MessageStore, MessageWrite, RecordBatch};

use super::buffer::MergeBuffer;
use super::listener;
use super::projection::project;

pub(crate) struct SyncState {
    pub(crate) user: Option<ChatUser>,
    pub(crate) active_peer: Option<ChatUser>,
    pub(crate) buffer: MergeBuffer,
    /// Listener generation; bumped on every teardown so an in-flight batch
    /// from a cancelled subscription cannot resurrect cleared state.
    pub(crate) epoch: u64,
    pub(crate) listeners: Vec<JoinHandle<()>>,
}

pub(crate) struct EngineInner<S> {
    pub(crate) store: S,
    pub(crate) config: ChatConfig,
    pub(crate) state: RwLock<SyncState>,
    view_tx: watch::Sender<Vec<ChatMessage>>,
    online_tx: watch::Sender<Vec<ChatUser>>,
    events_tx: broadcast::Sender<ChatEvent>,
}

impl<S: MessageStore> EngineInner<S> {
    /// Recompute and publish the conversation view from the current state.
    fn publish_view(&self, state: &SyncState) {
        self.view_tx
            .send_replace(project(&state.buffer, state.active_peer.as_ref()));
    }

    pub(crate) fn emit(&self, event: ChatEvent) {
        // No receivers is fine; the tracing sink already has the details.
        let _ = self.events_tx.send(event);
    }

    /// Normalize and merge one live batch, unless its epoch is stale.
    pub(crate) async fn apply_batch(&self, epoch: u64, side: StreamSide, batch: RecordBatch) {
        let messages = normalize_batch(&batch);
        let mut state = self.state.write().await;
        if state.epoch != epoch {
            debug!(
                ?side,
                batch_epoch = epoch,
                current_epoch = state.epoch,
                "dropping stale listener batch"
            );
            return;
        }
        if messages.is_empty() {
            return;
        }
        state.buffer.upsert_all(messages);
        self.publish_view(&state);
        debug!(?side, total = state.buffer.len(), "applied live batch");
    }

    /// Abort running listeners and invalidate their epoch.
    fn teardown_listeners(&self, state: &mut SyncState) {
        for handle in state.listeners.drain(..) {
            handle.abort();
        }
        state.epoch += 1;
    }
}

/// Facade over the reconciliation engine. Cheap to clone; all clones share
/// one state.
pub struct ChatEngine<S: MessageStore> {
    inner: Arc<EngineInner<S>>,
}

impl<S: MessageStore> Clone for ChatEngine<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MessageStore> ChatEngine<S> {
    /// Create an engine over `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ChatConfig::default())
    }

    /// Create an engine over `store` with an explicit configuration.
    pub fn with_config(store: S, config: ChatConfig) -> Self {
        let (view_tx, _) = watch::channel(Vec::new());
        let (online_tx, _) = watch::channel(Vec::new());
        let (events_tx, _) = broadcast::channel(config.event_capacity);
        Self {
            inner: Arc::new(EngineInner {
                store,
                config,
                state: RwLock::new(SyncState {
                    user: None,
                    active_peer: None,
                    buffer: MergeBuffer::new(),
                    epoch: 0,
                    listeners: Vec::new(),
                }),
                view_tx,
                online_tx,
                events_tx,
            }),
        }
    }

    // ── Lifecycle ──

    /// Establish both live subscriptions for `user`.
    ///
    /// Any previous session's listeners are torn down first.
    pub async fn sign_in(&self, user: ChatUser) {
        let mut state = self.inner.state.write().await;
        self.inner.teardown_listeners(&mut state);
        info!(user_id = %user.id, "chat engine: signing in");
        state.user = Some(user.clone());
        let epoch = state.epoch;
        state.listeners = listener::spawn_listeners(&self.inner, &user.id, epoch);
        self.inner.publish_view(&state);
        self.inner.emit(ChatEvent::Connected { user_id: user.id });
    }

    /// Cancel both subscriptions and drop all session state.
    pub async fn sign_out(&self) {
        let mut state = self.inner.state.write().await;
        let was_signed_in = state.user.take().is_some();
        self.inner.teardown_listeners(&mut state);
        state.buffer.clear();
        self.inner.publish_view(&state);
        if was_signed_in {
            info!("chat engine: signed out");
            self.inner.emit(ChatEvent::Disconnected);
        }
    }

    /// Forward auth-state changes from `auth` into the engine.
    ///
    /// The current value is applied immediately, then every change until the
    /// sender side is dropped.
    pub fn watch_auth(&self, mut auth: watch::Receiver<Option<ChatUser>>) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            loop {
                let current = auth.borrow_and_update().clone();
                match current {
                    Some(user) => engine.sign_in(user).await,
                    None => engine.sign_out().await,
                }
                if auth.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    /// Switch the active conversation partner.
    ///
    /// Tears down and re-establishes both subscriptions under a fresh epoch
    /// and clears the buffer; the new subscriptions' initial snapshots
    /// repopulate it.
    pub async fn set_active_peer(&self, peer: ChatUser) {
        let mut state = self.inner.state.write().await;
        debug!(peer_id = %peer.id, "chat engine: active peer set");
        state.active_peer = Some(peer);
        if let Some(user) = state.user.clone() {
            self.inner.teardown_listeners(&mut state);
            state.buffer.clear();
            let epoch = state.epoch;
            state.listeners = listener::spawn_listeners(&self.inner, &user.id, epoch);
        }
        self.inner.publish_view(&state);
    }

    /// Unset the active peer; the conversation view becomes empty.
    /// Subscriptions stay up.
    pub async fn clear_active_peer(&self) {
        let mut state = self.inner.state.write().await;
        state.active_peer = None;
        self.inner.publish_view(&state);
    }

    // ── Mediator operations ──

    /// Send a message to `to`.
    ///
    /// With no signed-in user this is a silent no-op returning `None`. The
    /// optimistic entry is visible in the view before the remote write
    /// completes, and stays even if that write fails (the failure goes to
    /// the tracing sink and the event stream; there is no retry queue).
    pub async fn send_message(&self, to: &str, content: &str) -> Option<ChatMessage> {
        let id = Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().timestamp_millis();

        let message = {
            let mut state = self.inner.state.write().await;
            let Some(user) = state.user.clone() else {
                warn!("send ignored: no signed-in user");
                return None;
            };
            let message = ChatMessage::new(id.clone(), user.id.clone(), to, content, timestamp);
            state.buffer.upsert_one(message.clone());
            self.inner.publish_view(&state);
            message
        };

        let write = MessageWrite::new(message.from.clone(), to, content, timestamp);
        if let Err(err) = self.inner.store.create_message(&id, &write).await {
            error!(message_id = %id, %err, "remote write failed; keeping optimistic entry");
            self.inner.emit(ChatEvent::SendFailed {
                message_id: id,
                detail: err.to_string(),
            });
        }
        Some(message)
    }

    /// Mark `message_id` as delivered, locally and remotely.
    ///
    /// The local upsert is identity-based and cannot duplicate the entry.
    /// A remote failure is logged and does not revert local state.
    pub async fn mark_delivered(&self, message_id: &str) {
        {
            let mut state = self.inner.state.write().await;
            if let Some(existing) = state.buffer.get(message_id) {
                let updated = existing.with_status(MessageStatus::Delivered);
                state.buffer.upsert_one(updated);
                self.inner.publish_view(&state);
            }
        }

        if let Err(err) = self
            .inner
            .store
            .update_status(message_id, MessageStatus::Delivered.as_raw())
            .await
        {
            error!(%message_id, %err, "remote status update failed");
            self.inner.emit(ChatEvent::StatusUpdateFailed {
                message_id: message_id.to_string(),
                detail: err.to_string(),
            });
        }
    }

    /// Load up to `limit` older messages of the conversation with `peer_id`
    /// into the buffer (default limit from config). Returns the number of
    /// records merged.
    pub async fn load_history(&self, peer_id: &str, limit: Option<usize>) -> Result<usize> {
        let user = self
            .current_user()
            .await
            .ok_or(ChatError::NotSignedIn)?;
        let limit = limit.unwrap_or(self.inner.config.history_page_size);

        let records = self
            .inner
            .store
            .query_conversation(&user.id, peer_id, limit)
            .await?;
        let messages = normalize_batch(&records);
        let merged = messages.len();

        let mut state = self.inner.state.write().await;
        state.buffer.upsert_all(messages);
        self.inner.publish_view(&state);
        debug!(peer_id, merged, total = state.buffer.len(), "history page merged");
        Ok(merged)
    }

    // ── Observation ──

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    /// The reactive conversation view for the active peer.
    pub fn conversation_view(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.inner.view_tx.subscribe()
    }

    /// Engine observability events.
    pub fn events(&self) -> broadcast::Receiver<ChatEvent> {
        self.inner.events_tx.subscribe()
    }

    /// The online roster published by [`set_online_peers`](Self::set_online_peers).
    pub fn online_peers(&self) -> watch::Receiver<Vec<ChatUser>> {
        self.inner.online_tx.subscribe()
    }

    /// Replace the online roster (fed by the presence layer).
    pub fn set_online_peers(&self, peers: Vec<ChatUser>) {
        self.inner.online_tx.send_replace(peers);
    }

    /// Ordered copy of the whole merge buffer.
    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        self.inner.state.read().await.buffer.snapshot().to_vec()
    }

    /// Messages exchanged with `peer_id`, without changing the active peer.
    pub async fn messages_with(&self, peer_id: &str) -> Vec<ChatMessage> {
        self.inner
            .state
            .read()
            .await
            .buffer
            .snapshot()
            .iter()
            .filter(|message| message.involves(peer_id))
            .cloned()
            .collect()
    }

    /// Drop all buffered messages without touching subscriptions.
    pub async fn clear_messages(&self) {
        let mut state = self.inner.state.write().await;
        state.buffer.clear();
        self.inner.publish_view(&state);
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<ChatUser> {
        self.inner.state.read().await.user.clone()
    }

    /// The active conversation partner, if any.
    pub async fn active_peer(&self) -> Option<ChatUser> {
        self.inner.state.read().await.active_peer.clone()
    }

    /// Whether any live subscription is established.
    pub async fn is_connected(&self) -> bool {
        !self.inner.state.read().await.listeners.is_empty()
    }
}
