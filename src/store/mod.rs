//! Collection storage port
//!
//! Documents are the unit of persistence: every mutation rewrites the whole
//! document, and `save` stamps a document-level `lastUpdated`. The port is
//! injectable so repositories can be tested against the in-memory binding
//! without touching a filesystem.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::Result;

#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Read the named document. `Ok(None)` when it has never been written
    /// (self-healing first run); a present but unreadable document is a
    /// `Storage` error.
    async fn load(&self, name: &str) -> Result<Option<Value>>;

    /// Replace the named document in full, stamping `lastUpdated`.
    async fn save(&self, name: &str, document: Value) -> Result<()>;
}

/// Stamp `lastUpdated` on a document object before it is persisted.
pub(crate) fn stamp_last_updated(document: &mut Value) {
    if let Value::Object(map) = document {
        map.insert(
            "lastUpdated".to_string(),
            Value::String(crate::model::now_iso()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_sets_last_updated_on_objects() {
        let mut doc = serde_json::json!({"tasks": []});
        stamp_last_updated(&mut doc);
        assert!(doc["lastUpdated"].is_string());
    }

    #[test]
    fn test_stamp_ignores_non_objects() {
        let mut doc = serde_json::json!([1, 2, 3]);
        stamp_last_updated(&mut doc);
        assert!(doc.is_array());
    }
}
