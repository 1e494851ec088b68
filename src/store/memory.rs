//! In-memory collection store
//!
//! Test binding for the storage port; repository tests run against this to
//! stay off the filesystem.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{stamp_last_updated, CollectionStore};
use crate::types::Result;

#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn load(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.documents.lock().unwrap().get(name).cloned())
    }

    async fn save(&self, name: &str, mut document: Value) -> Result<()> {
        stamp_last_updated(&mut document);
        self.documents
            .lock()
            .unwrap()
            .insert(name.to_string(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load("tasks").await.unwrap().is_none());

        store
            .save("tasks", serde_json::json!({"tasks": []}))
            .await
            .unwrap();

        let doc = store.load("tasks").await.unwrap().unwrap();
        assert!(doc["tasks"].as_array().unwrap().is_empty());
        assert!(doc["lastUpdated"].is_string());
    }
}
