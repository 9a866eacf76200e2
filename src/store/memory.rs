//! # In-Memory Store
//!
//! A complete in-process [`MessageStore`] used by the test suites and demos.
//! Documents live in a vector; live subscriptions get the current matching
//! snapshot as their first batch and single-document batches on every
//! subsequent create or update, mirroring the snapshot-then-changes contract
//! of the production document database.
//!
//! Test hooks: [`InMemoryStore::seed`] inserts a raw document in either
//! schema without going through the write path, and
//! [`InMemoryStore::fail_writes`] makes the write paths error to exercise
//! the engine's failure handling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::messaging::{RawRecord, StreamSide};

use super::{MessageStore, MessageWrite, RecordBatch, Result, StoreError};

struct Subscriber {
    user_id: String,
    side: StreamSide,
    tx: mpsc::Sender<RecordBatch>,
}

#[derive(Default)]
struct Inner {
    docs: Vec<RawRecord>,
    subscribers: Vec<Subscriber>,
}

/// In-process document store.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    fail_writes: AtomicBool,
    stream_capacity: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            fail_writes: AtomicBool::new(false),
            stream_capacity: 64,
        }
    }

    /// Make subsequent `create_message` / `update_status` calls fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert or overwrite a raw document directly, bypassing the write
    /// schema, and notify matching subscribers. Accepts either field shape.
    pub fn seed(&self, id: impl Into<String>, fields: Value) {
        let record = RawRecord::new(id, fields);
        let mut inner = self.lock();
        upsert_doc(&mut inner.docs, record.clone());
        notify(&mut inner, &record);
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.lock().docs.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.lock().docs.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }

    fn listen(&self, user_id: &str, side: StreamSide) -> mpsc::Receiver<RecordBatch> {
        let (tx, rx) = mpsc::channel(self.stream_capacity);
        let mut inner = self.lock();

        let snapshot: RecordBatch = inner
            .docs
            .iter()
            .filter(|doc| matches(doc, user_id, side))
            .cloned()
            .collect();
        let _ = tx.try_send(snapshot);

        inner.subscribers.push(Subscriber {
            user_id: user_id.to_string(),
            side,
            tx,
        });
        debug!(user_id, ?side, "in-memory store: subscription registered");
        rx
    }
}

/// Sender of a document, under whichever schema it was stored.
fn doc_sender(doc: &RawRecord) -> Option<&str> {
    let fields = doc.fields.as_object()?;
    fields
        .get("from_user_id")
        .or_else(|| fields.get("sender"))
        .and_then(Value::as_str)
}

/// Receiver of a document, under whichever schema it was stored.
fn doc_receiver(doc: &RawRecord) -> Option<&str> {
    let fields = doc.fields.as_object()?;
    fields
        .get("to_user_id")
        .or_else(|| fields.get("receiverId"))
        .and_then(Value::as_str)
}

fn doc_timestamp(doc: &RawRecord) -> i64 {
    doc.fields
        .get("timestamp")
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

fn matches(doc: &RawRecord, user_id: &str, side: StreamSide) -> bool {
    let field = match side {
        StreamSide::Sent => doc_sender(doc),
        StreamSide::Received => doc_receiver(doc),
    };
    field == Some(user_id)
}

fn upsert_doc(docs: &mut Vec<RawRecord>, record: RawRecord) {
    match docs.iter_mut().find(|doc| doc.id == record.id) {
        Some(existing) => *existing = record,
        None => docs.push(record),
    }
}

fn notify(inner: &mut Inner, record: &RawRecord) {
    inner.subscribers.retain(|sub| !sub.tx.is_closed());
    for sub in &inner.subscribers {
        if matches(record, &sub.user_id, sub.side) {
            let _ = sub.tx.try_send(vec![record.clone()]);
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    fn listen_sent(&self, user_id: &str) -> Result<mpsc::Receiver<RecordBatch>> {
        Ok(self.listen(user_id, StreamSide::Sent))
    }

    fn listen_received(&self, user_id: &str) -> Result<mpsc::Receiver<RecordBatch>> {
        Ok(self.listen(user_id, StreamSide::Received))
    }

    async fn create_message(&self, id: &str, write: &MessageWrite) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("injected write failure".to_string()));
        }
        let record = RawRecord::new(id, serde_json::to_value(write)?);
        let mut inner = self.lock();
        upsert_doc(&mut inner.docs, record.clone());
        notify(&mut inner, &record);
        Ok(())
    }

    async fn update_status(&self, id: &str, status: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write("injected write failure".to_string()));
        }
        let mut inner = self.lock();
        let Some(doc) = inner.docs.iter_mut().find(|doc| doc.id == id) else {
            return Err(StoreError::Write(format!("no such document: {}", id)));
        };
        if let Some(fields) = doc.fields.as_object_mut() {
            fields.insert("status".to_string(), Value::String(status.to_string()));
        }
        let record = doc.clone();
        notify(&mut inner, &record);
        Ok(())
    }

    async fn query_conversation(
        &self,
        user_a: &str,
        user_b: &str,
        limit: usize,
    ) -> Result<Vec<RawRecord>> {
        let inner = self.lock();
        let mut page: Vec<RawRecord> = inner
            .docs
            .iter()
            .filter(|doc| {
                let between = |id: Option<&str>| id == Some(user_a) || id == Some(user_b);
                between(doc_sender(doc)) && between(doc_receiver(doc))
            })
            .cloned()
            .collect();
        page.sort_by_key(|doc| std::cmp::Reverse(doc_timestamp(doc)));
        page.truncate(limit);
        Ok(page)
    }
}
