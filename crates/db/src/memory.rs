//! Process-local [`DocumentStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{Document, DocumentPatch, Fields};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, SnapshotHub, Subscription};

#[derive(Debug, Default)]
struct Collection {
    docs: Vec<Document>,
    index: HashMap<String, usize>,
}

impl Collection {
    fn get(&self, id: &str) -> Option<&Document> {
        self.index.get(id).map(|&at| &self.docs[at])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Document> {
        match self.index.get(id) {
            Some(&at) => self.docs.get_mut(at),
            None => None,
        }
    }

    fn upsert(&mut self, doc: Document) {
        match self.index.get(&doc.id) {
            Some(&at) => self.docs[at] = doc,
            None => {
                self.index.insert(doc.id.clone(), self.docs.len());
                self.docs.push(doc);
            }
        }
    }
}

/// In-memory store. Documents live for the lifetime of the process.
///
/// The data lock is always taken before the hub lock, and the snapshot of a
/// collection is published while the write lock is still held, so snapshots
/// are delivered in write order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    hub: SnapshotHub,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&self, name: &str, collection: &Collection) {
        if self.hub.is_watched(name) {
            self.hub.publish(name, collection.docs.clone());
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let id = Uuid::now_v7().to_string();
        let mut data = self.collections.write().await;
        let entry = data.entry(collection.to_string()).or_default();
        entry.upsert(Document::new(id.clone(), fields));
        self.publish(collection, entry);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let data = self.collections.read().await;
        Ok(data.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        let mut data = self.collections.write().await;
        let entry = data.entry(collection.to_string()).or_default();
        entry.upsert(Document::new(id, fields));
        self.publish(collection, entry);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: DocumentPatch) -> StoreResult<()> {
        let mut data = self.collections.write().await;
        let entry = data
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let doc = entry
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        patch.apply(&mut doc.fields);
        self.publish(collection, entry);
        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let data = self.collections.read().await;
        Ok(data
            .get(collection)
            .map(|c| c.docs.clone())
            .unwrap_or_default())
    }

    async fn subscribe(&self, collection: &str) -> StoreResult<Subscription> {
        let data = self.collections.read().await;
        Ok(self.hub.subscribe(collection, || {
            data.get(collection)
                .map(|c| c.docs.clone())
                .unwrap_or_default()
        }))
    }
}
