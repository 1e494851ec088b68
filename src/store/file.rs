//! File-backed collection store
//!
//! One JSON file per collection under the data directory. Writes go through
//! a temp file followed by a rename so a crash mid-write never leaves a
//! half-written document behind. File I/O is synchronous: documents are
//! small and every repository call is serialized per collection anyway.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{stamp_last_updated, CollectionStore};
use crate::types::{HearthError, Result};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| HearthError::Storage(format!("create {}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl CollectionStore for FileStore {
    async fn load(&self, name: &str) -> Result<Option<Value>> {
        let path = self.path(name);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            // Absent file is the empty state, not an error.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HearthError::Storage(format!(
                    "read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            HearthError::Storage(format!("parse {}: {}", path.display(), e))
        })
    }

    async fn save(&self, name: &str, mut document: Value) -> Result<()> {
        stamp_last_updated(&mut document);

        let path = self.path(name);
        let tmp = self.dir.join(format!("{}.json.tmp", name));
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| HearthError::Storage(format!("serialize {}: {}", name, e)))?;

        std::fs::write(&tmp, &bytes)
            .map_err(|e| HearthError::Storage(format!("write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| HearthError::Storage(format!("rename {}: {}", path.display(), e)))?;

        debug!(collection = name, bytes = bytes.len(), "Document persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_document_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.load("tasks").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_and_stamps() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store
            .save("tasks", serde_json::json!({"tasks": [{"id": "task_1"}]}))
            .await
            .unwrap();

        let doc = store.load("tasks").await.unwrap().unwrap();
        assert_eq!(doc["tasks"][0]["id"], "task_1");
        assert!(doc["lastUpdated"].is_string());

        // No temp file left behind after the rename.
        assert!(!dir.path().join("tasks.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tasks.json"), b"{not json").unwrap();

        let store = FileStore::open(dir.path()).unwrap();
        let err = store.load("tasks").await.unwrap_err();
        assert!(matches!(err, HearthError::Storage(_)));
    }

    #[tokio::test]
    async fn test_save_replaces_prior_content_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store
            .save("tasks", serde_json::json!({"tasks": [{"id": "a"}, {"id": "b"}]}))
            .await
            .unwrap();
        store
            .save("tasks", serde_json::json!({"tasks": [{"id": "b"}]}))
            .await
            .unwrap();

        let doc = store.load("tasks").await.unwrap().unwrap();
        assert_eq!(doc["tasks"].as_array().unwrap().len(), 1);
    }
}
