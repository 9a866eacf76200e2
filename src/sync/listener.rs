//! Dual-Stream Listener Coordinator
//!
//! Establishes the two live subscriptions for a signed-in user (one where
//! the user is the sender, one where the user is the receiver) and pumps
//! their batches into the engine tagged with the epoch they were spawned
//! under. The engine drops batches whose epoch is stale, so a cancelled
//! subscription's in-flight callback is a no-op.
//!
//! A failed subscribe is logged and surfaced as an event; there is no
//! automatic retry. The remaining stream and history loads keep the view
//! consistent until the next sign-in or peer switch re-establishes both.

use std::sync::{Arc, Weak};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::messaging::{ChatEvent, StreamSide};
use crate::store::{MessageStore, RecordBatch};

use super::engine::EngineInner;

/// Subscribe both directions for `user_id` under `epoch`.
///
/// Returns the handles of whichever stream tasks could be spawned.
pub(crate) fn spawn_listeners<S: MessageStore>(
    inner: &Arc<EngineInner<S>>,
    user_id: &str,
    epoch: u64,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::with_capacity(2);
    for side in [StreamSide::Sent, StreamSide::Received] {
        let subscribed = match side {
            StreamSide::Sent => inner.store.listen_sent(user_id),
            StreamSide::Received => inner.store.listen_received(user_id),
        };
        match subscribed {
            Ok(rx) => {
                debug!(?side, epoch, user_id, "listener subscribed");
                handles.push(spawn_stream_task(Arc::downgrade(inner), side, epoch, rx));
            }
            Err(err) => {
                error!(?side, user_id, %err, "listener subscribe failed");
                inner.emit(ChatEvent::StreamError {
                    side,
                    detail: err.to_string(),
                });
            }
        }
    }
    handles
}

/// Pump one stream until it closes, the task is aborted, or the engine is
/// gone. Holds the engine weakly so a dropped engine is not kept alive by
/// its own listener tasks.
fn spawn_stream_task<S: MessageStore>(
    inner: Weak<EngineInner<S>>,
    side: StreamSide,
    epoch: u64,
    mut rx: mpsc::Receiver<RecordBatch>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(batch) = rx.recv().await {
            let Some(engine) = inner.upgrade() else {
                break;
            };
            engine.apply_batch(epoch, side, batch).await;
        }
        debug!(?side, epoch, "listener stream ended");
    })
}
