//! Settings repository
//!
//! Every read path returns the masked document; the unredacted `apiKeys`
//! values only ever exist on disk and inside the mutation cycle.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::bus::{ChangeEvent, EventBus};
use crate::model::{Settings, SettingsPatch};
use crate::store::CollectionStore;
use crate::types::{HearthError, Result};

const COLLECTION: &str = "settings";

pub struct SettingsRepository {
    store: Arc<dyn CollectionStore>,
    guard: Mutex<()>,
    bus: EventBus,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn CollectionStore>, bus: EventBus) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
            bus,
        }
    }

    async fn load(&self) -> Result<Settings> {
        let Some(doc) = self.store.load(COLLECTION).await? else {
            return Ok(Settings::default());
        };
        serde_json::from_value(doc)
            .map_err(|e| HearthError::Storage(format!("malformed settings document: {}", e)))
    }

    /// Masked settings for `GET /api/config`.
    pub async fn masked(&self) -> Result<Settings> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.masked())
    }

    /// Merge the patch sections, persist, and broadcast the masked result.
    pub async fn update(&self, patch: SettingsPatch) -> Result<Settings> {
        let _guard = self.guard.lock().await;
        let mut settings = self.load().await?;
        settings.apply(patch);

        let value = serde_json::to_value(&settings)
            .map_err(|e| HearthError::Storage(format!("serialize settings: {}", e)))?;
        self.store.save(COLLECTION, value).await?;

        let masked = settings.masked();
        self.bus.publish(ChangeEvent::ConfigUpdated {
            config: masked.clone(),
        });
        Ok(masked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::BTreeMap;

    fn repo() -> (SettingsRepository, EventBus) {
        let bus = EventBus::new();
        let repo = SettingsRepository::new(Arc::new(MemoryStore::new()), bus.clone());
        (repo, bus)
    }

    #[tokio::test]
    async fn test_update_persists_full_keys_but_returns_masked() {
        let (repo, bus) = repo();
        let mut rx = bus.subscribe();

        let mut keys = BTreeMap::new();
        keys.insert("kalshi".to_string(), "secret-key-9876".to_string());

        let returned = repo
            .update(SettingsPatch {
                api_keys: Some(keys),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(returned.api_keys["kalshi"], "****9876");

        // Stored document keeps the unredacted key.
        let stored = repo.store.load("settings").await.unwrap().unwrap();
        assert_eq!(stored["apiKeys"]["kalshi"], "secret-key-9876");

        // Broadcast carries the masked copy only.
        match rx.try_recv().unwrap() {
            ChangeEvent::ConfigUpdated { config } => {
                assert_eq!(config.api_keys["kalshi"], "****9876");
            }
            other => panic!("unexpected event: {:?}", other),
        }

        // And so does every subsequent read.
        let read = repo.masked().await.unwrap();
        assert_eq!(read.api_keys["kalshi"], "****9876");
    }

    #[tokio::test]
    async fn test_first_read_is_empty_defaults() {
        let (repo, _bus) = repo();
        let settings = repo.masked().await.unwrap();
        assert!(settings.api_keys.is_empty());
        assert_eq!(settings.trading, serde_json::json!({}));
    }
}
