//! Cron job record entity
//!
//! Schedules are stored verbatim and never evaluated here; no scheduler runs
//! inside this service. `record_run` only books externally-reported
//! executions, which is why it ignores `enabled` and `schedule`.

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso, required};
use crate::types::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronJob {
    pub id: String,
    pub name: String,
    pub schedule: String,
    pub task: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub last_run: Option<String>,
    #[serde(default)]
    pub run_count: u64,
    /// Always null: scheduling is external to this service.
    #[serde(default)]
    pub next_run: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_enabled() -> bool {
    true
}

/// Create input for `POST /api/cron`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCronJob {
    pub name: Option<String>,
    pub schedule: Option<String>,
    pub task: Option<String>,
    pub enabled: Option<bool>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Update allow-list for `PATCH /api/cron/{id}`
///
/// `runCount` and `lastRun` are deliberately absent: they only advance
/// through the record-run operation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronPatch {
    pub name: Option<String>,
    pub schedule: Option<String>,
    pub task: Option<String>,
    pub enabled: Option<bool>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CronJob {
    pub fn new(input: NewCronJob) -> Result<Self> {
        let name = required(input.name, "name")?;
        let schedule = required(input.schedule, "schedule")?;
        let task = required(input.task, "task")?;
        let now = now_iso();
        Ok(Self {
            id: new_id("cron"),
            name,
            schedule,
            task,
            enabled: input.enabled.unwrap_or(true),
            last_run: None,
            run_count: 0,
            next_run: None,
            status: input.status,
            tags: input.tags.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: CronPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.schedule {
            self.schedule = v;
        }
        if let Some(v) = patch.task {
            self.task = v;
        }
        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.status {
            self.status = Some(v);
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
    }

    /// Book one externally-reported execution.
    pub fn record_run(&mut self, stamp: &str) {
        self.last_run = Some(stamp.to_string());
        self.run_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> CronJob {
        CronJob::new(NewCronJob {
            name: Some("backup".to_string()),
            schedule: Some("0 3 * * *".to_string()),
            task: Some("tar -czf backup.tgz data".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let job = job();
        assert!(job.enabled);
        assert_eq!(job.run_count, 0);
        assert!(job.last_run.is_none());
        assert!(job.next_run.is_none());
    }

    #[test]
    fn test_record_run_twice_keeps_latest_stamp_only() {
        let mut job = job();
        job.record_run("2026-08-07T01:00:00.000Z");
        job.record_run("2026-08-07T02:00:00.000Z");

        assert_eq!(job.run_count, 2);
        assert_eq!(job.last_run.as_deref(), Some("2026-08-07T02:00:00.000Z"));
    }

    #[test]
    fn test_record_run_ignores_enabled_flag() {
        let mut job = job();
        job.enabled = false;
        job.record_run("2026-08-07T01:00:00.000Z");
        assert_eq!(job.run_count, 1);
    }

    #[test]
    fn test_patch_cannot_touch_run_count() {
        let patch: CronPatch =
            serde_json::from_value(serde_json::json!({"runCount": 50, "enabled": false})).unwrap();
        let mut job = job();
        job.record_run("2026-08-07T01:00:00.000Z");
        job.apply(patch);

        assert_eq!(job.run_count, 1);
        assert!(!job.enabled);
    }
}
