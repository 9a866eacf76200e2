//! Common test utilities
//!
//! Fixtures and wait helpers shared by the integration suites.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::watch;
use trekchat::messaging::ChatMessage;
use trekchat::store::InMemoryStore;

/// Install a test subscriber so `RUST_LOG` surfaces engine traces during
/// test runs. Safe to call from every test; only the first call wins.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Legacy-schema document fields (`sender` / `receiverId` / `text`).
pub fn legacy_fields(from: &str, to: &str, text: &str, ts: i64) -> Value {
    json!({
        "sender": from,
        "receiverId": to,
        "text": text,
        "timestamp": ts,
        "chatId": format!("{}_{}", from, to),
    })
}

/// Current-schema document fields (`from_user_id` / `to_user_id` / `content`).
pub fn current_fields(from: &str, to: &str, content: &str, ts: i64, status: &str) -> Value {
    json!({
        "from_user_id": from,
        "to_user_id": to,
        "content": content,
        "timestamp": ts,
        "status": status,
    })
}

/// A store pre-seeded with a u1/u2 conversation in both schemas and one
/// unrelated u3/u4 message.
pub fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.seed("m1", legacy_fields("u1", "u2", "first", 100));
    store.seed("m2", current_fields("u2", "u1", "second", 200, "sent"));
    store.seed("m3", legacy_fields("u3", "u4", "unrelated", 300));
    store
}

/// Wait until the watched view satisfies `predicate`, or panic after two
/// seconds.
pub async fn wait_for_view<F>(
    rx: &mut watch::Receiver<Vec<ChatMessage>>,
    mut predicate: F,
) -> Vec<ChatMessage>
where
    F: FnMut(&[ChatMessage]) -> bool,
{
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let view = rx.borrow_and_update();
                if predicate(&view) {
                    return view.clone();
                }
            }
            rx.changed().await.expect("view channel closed");
        }
    })
    .await
    .expect("view did not reach expected state in time")
}
