//! Resource repositories
//!
//! One repository per entity kind, all built on the same `Collection`
//! plumbing: load the document from the store, locate/mutate entries,
//! persist the whole document, then notify. Every call reloads from storage
//! at entry, so no cross-request state is retained - a failed save leaves
//! nothing stale behind.

pub mod cron;
pub mod events;
pub mod reminders;
pub mod settings;
pub mod tasks;
pub mod team;

pub use cron::CronRepository;
pub use events::EventRepository;
pub use reminders::ReminderRepository;
pub use settings::SettingsRepository;
pub use tasks::TaskRepository;
pub use team::TeamRepository;

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::model::now_iso;
use crate::store::CollectionStore;
use crate::types::{HearthError, Result};

/// A persisted entity kind: names its document and identifies records.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human-readable kind for error messages ("Task").
    const KIND: &'static str;
    /// Document name, which doubles as the plural array key ("tasks").
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Refresh `updatedAt`.
    fn touch(&mut self, stamp: String);
}

/// Generic load → locate → mutate → persist plumbing shared by the typed
/// repositories. The guard serializes cycles per collection so two logically
/// concurrent requests cannot interleave mid-mutation.
pub struct Collection<R: Record> {
    store: Arc<dyn CollectionStore>,
    guard: Mutex<()>,
    _record: PhantomData<R>,
}

impl<R: Record> Collection<R> {
    pub fn new(store: Arc<dyn CollectionStore>) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// Raw document for collection GETs; empty shape when never written.
    pub async fn document(&self) -> Result<Value> {
        let _guard = self.guard.lock().await;
        match self.store.load(R::COLLECTION).await? {
            Some(doc) => Ok(doc),
            None => {
                let mut doc = serde_json::Map::new();
                doc.insert(R::COLLECTION.to_string(), Value::Array(Vec::new()));
                doc.insert("lastUpdated".to_string(), Value::Null);
                Ok(Value::Object(doc))
            }
        }
    }

    async fn load_items(&self) -> Result<Vec<R>> {
        let Some(mut doc) = self.store.load(R::COLLECTION).await? else {
            return Ok(Vec::new());
        };
        let Some(items) = doc.get_mut(R::COLLECTION) else {
            return Ok(Vec::new());
        };
        serde_json::from_value(items.take()).map_err(|e| {
            HearthError::Storage(format!("malformed {} document: {}", R::COLLECTION, e))
        })
    }

    async fn save_items(&self, items: &[R]) -> Result<()> {
        let array = serde_json::to_value(items)
            .map_err(|e| HearthError::Storage(format!("serialize {}: {}", R::COLLECTION, e)))?;
        let mut doc = serde_json::Map::new();
        doc.insert(R::COLLECTION.to_string(), array);
        self.store.save(R::COLLECTION, Value::Object(doc)).await
    }

    fn not_found(id: &str) -> HearthError {
        HearthError::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        }
    }

    /// Full list in insertion order.
    pub async fn list(&self) -> Result<Vec<R>> {
        let _guard = self.guard.lock().await;
        self.load_items().await
    }

    pub async fn get(&self, id: &str) -> Result<R> {
        let _guard = self.guard.lock().await;
        self.load_items()
            .await?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))
    }

    /// Append a freshly built record and persist.
    pub async fn insert(&self, record: R) -> Result<R> {
        let _guard = self.guard.lock().await;
        let mut items = self.load_items().await?;
        items.push(record.clone());
        self.save_items(&items).await?;
        Ok(record)
    }

    /// Locate by id, apply `mutate` (which receives the stamp being applied),
    /// refresh `updatedAt`, persist.
    pub async fn update_with(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut R, &str),
    ) -> Result<R> {
        let (record, _) = self
            .update_if(id, |record, stamp| {
                mutate(record, stamp);
                true
            })
            .await?;
        Ok(record)
    }

    /// Like `update_with`, but `mutate` reports whether anything changed;
    /// unchanged records are neither stamped nor persisted.
    pub async fn update_if(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut R, &str) -> bool,
    ) -> Result<(R, bool)> {
        let _guard = self.guard.lock().await;
        let mut items = self.load_items().await?;
        let Some(record) = items.iter_mut().find(|r| r.id() == id) else {
            return Err(Self::not_found(id));
        };

        let stamp = now_iso();
        if !mutate(record, &stamp) {
            return Ok((record.clone(), false));
        }
        record.touch(stamp);
        let updated = record.clone();
        self.save_items(&items).await?;
        Ok((updated, true))
    }

    /// Splice the record out and persist. No tombstoning; the id is gone.
    pub async fn remove(&self, id: &str) -> Result<R> {
        let _guard = self.guard.lock().await;
        let mut items = self.load_items().await?;
        let position = items
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        let removed = items.remove(position);
        self.save_items(&items).await?;
        Ok(removed)
    }
}
