//! Cron job repository
//!
//! Stores schedule metadata and books externally-reported runs; nothing here
//! evaluates a schedule or triggers anything.

use std::sync::Arc;

use serde_json::Value;

use super::{Collection, Record};
use crate::bus::{ChangeEvent, EventBus};
use crate::model::{CronJob, CronPatch, NewCronJob};
use crate::store::CollectionStore;
use crate::types::Result;

impl Record for CronJob {
    const KIND: &'static str = "Cron job";
    const COLLECTION: &'static str = "jobs";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, stamp: String) {
        self.updated_at = stamp;
    }
}

pub struct CronRepository {
    collection: Collection<CronJob>,
    bus: EventBus,
}

impl CronRepository {
    pub fn new(store: Arc<dyn CollectionStore>, bus: EventBus) -> Self {
        Self {
            collection: Collection::new(store),
            bus,
        }
    }

    pub async fn document(&self) -> Result<Value> {
        self.collection.document().await
    }

    pub async fn list(&self) -> Result<Vec<CronJob>> {
        self.collection.list().await
    }

    pub async fn get(&self, id: &str) -> Result<CronJob> {
        self.collection.get(id).await
    }

    pub async fn create(&self, input: NewCronJob) -> Result<CronJob> {
        let job = self.collection.insert(CronJob::new(input)?).await?;
        self.bus.publish(ChangeEvent::CronCreated { job: job.clone() });
        Ok(job)
    }

    pub async fn update(&self, id: &str, patch: CronPatch) -> Result<CronJob> {
        let job = self
            .collection
            .update_with(id, |job, _| job.apply(patch))
            .await?;
        self.bus.publish(ChangeEvent::CronUpdated { job: job.clone() });
        Ok(job)
    }

    pub async fn delete(&self, id: &str) -> Result<CronJob> {
        let job = self.collection.remove(id).await?;
        self.bus.publish(ChangeEvent::CronDeleted { id: job.id.clone() });
        Ok(job)
    }

    /// Book one externally-reported execution: advances `lastRun` and
    /// increments `runCount`, regardless of `enabled` or `schedule`.
    pub async fn record_run(&self, id: &str) -> Result<CronJob> {
        let job = self
            .collection
            .update_with(id, |job, stamp| job.record_run(stamp))
            .await?;
        self.bus.publish(ChangeEvent::CronRun { job: job.clone() });
        Ok(job)
    }
}
