//! The document store contract and the snapshot subscription plumbing shared
//! by every implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::document::{Document, DocumentPatch, Fields};
use crate::error::StoreResult;

/// Full contents of one collection, in creation order.
pub type Snapshot = Arc<Vec<Document>>;

/// Capability required from the backing store.
///
/// Every write is visible to subscribers of the affected collection before
/// the write returns, so a caller that writes and then reads its own
/// subscription always sees the write.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document under a store-generated id and return the id.
    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String>;

    /// Fetch a single document.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Create the document or replace all of its fields.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Apply a partial update atomically. Fails with `NotFound` when the
    /// document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: DocumentPatch) -> StoreResult<()>;

    /// All documents of a collection, in creation order.
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Live view of a collection. The first value is the current contents;
    /// each change delivers the complete new contents.
    async fn subscribe(&self, collection: &str) -> StoreResult<Subscription>;

    /// Confirm the store is reachable.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Receiving half of a collection subscription.
///
/// Deliveries are wholesale snapshots. A slow consumer skips intermediate
/// snapshots and only ever sees the latest one.
#[derive(Debug, Clone)]
pub struct Subscription {
    rx: watch::Receiver<Snapshot>,
}

impl Subscription {
    fn new(mut rx: watch::Receiver<Snapshot>) -> Self {
        // The initial contents count as the first delivery.
        rx.mark_changed();
        Self { rx }
    }

    /// Independent receiver on the same collection whose first delivery is
    /// the current snapshot.
    pub fn resubscribe(&self) -> Self {
        Self::new(self.rx.clone())
    }

    /// Latest snapshot, without waiting.
    pub fn current(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next undelivered snapshot. Returns `None` once the store
    /// has been dropped.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

// ---------------------------------------------------------------------------
// Snapshot hub
// ---------------------------------------------------------------------------

/// One watch channel per subscribed collection.
///
/// Channels are created lazily on first subscription; collections nobody
/// subscribed to are never materialised.
#[derive(Debug, Default)]
pub(crate) struct SnapshotHub {
    channels: Mutex<HashMap<String, watch::Sender<Snapshot>>>,
}

impl SnapshotHub {
    /// Subscribe to `collection`, seeding the channel with `initial` if it
    /// does not exist yet.
    pub(crate) fn subscribe(
        &self,
        collection: &str,
        initial: impl FnOnce() -> Vec<Document>,
    ) -> Subscription {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let rx = match channels.get(collection) {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = watch::channel(Arc::new(initial()));
                channels.insert(collection.to_string(), tx);
                rx
            }
        };
        Subscription::new(rx)
    }

    pub(crate) fn is_watched(&self, collection: &str) -> bool {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(collection)
    }

    /// Replace the snapshot of `collection`, notifying every receiver.
    pub(crate) fn publish(&self, collection: &str, docs: Vec<Document>) {
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = channels.get(collection) {
            tx.send_replace(Arc::new(docs));
        }
    }
}
