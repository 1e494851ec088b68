//! Reminder entity
//!
//! The pending → completed transition is one-way; `completedAt` is only ever
//! written by the complete operation.

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso, required, Priority, Recurrence};
use crate::types::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub remind_at: String,
    #[serde(default)]
    pub recurring: Option<Recurrence>,
    /// Where the reminder came from: "manual", "task", "calendar", ...
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: ReminderStatus,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_source() -> String {
    "manual".to_string()
}

/// Create input for `POST /api/reminders`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReminder {
    pub title: Option<String>,
    pub remind_at: Option<String>,
    pub recurring: Option<Recurrence>,
    pub source: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

/// Update allow-list for `PATCH /api/reminders/{id}`
///
/// `status` and `completedAt` are absent: completion only happens through
/// the complete operation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub remind_at: Option<String>,
    pub recurring: Option<Recurrence>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

impl Reminder {
    pub fn new(input: NewReminder) -> Result<Self> {
        let title = required(input.title, "title")?;
        let remind_at = required(input.remind_at, "remindAt")?;
        let now = now_iso();
        Ok(Self {
            id: new_id("reminder"),
            title,
            remind_at,
            recurring: input.recurring,
            source: input.source.unwrap_or_else(default_source),
            priority: input.priority.unwrap_or_default(),
            status: ReminderStatus::Pending,
            completed_at: None,
            tags: input.tags.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: ReminderPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.remind_at {
            self.remind_at = v;
        }
        if let Some(v) = patch.recurring {
            self.recurring = Some(v);
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
    }

    /// One-way completion. Returns false when already completed.
    pub fn complete(&mut self, stamp: &str) -> bool {
        if self.status == ReminderStatus::Completed {
            return false;
        }
        self.status = ReminderStatus::Completed;
        self.completed_at = Some(stamp.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder() -> Reminder {
        Reminder::new(NewReminder {
            title: Some("Water plants".to_string()),
            remind_at: Some("2026-08-08T08:00:00.000Z".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let r = reminder();
        assert_eq!(r.source, "manual");
        assert_eq!(r.priority, Priority::Medium);
        assert_eq!(r.status, ReminderStatus::Pending);
        assert!(r.completed_at.is_none());
    }

    #[test]
    fn test_remind_at_is_required() {
        let err = Reminder::new(NewReminder {
            title: Some("x".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: remindAt");
    }

    #[test]
    fn test_complete_is_one_way() {
        let mut r = reminder();
        assert!(r.complete("2026-08-08T08:05:00.000Z"));
        assert_eq!(r.status, ReminderStatus::Completed);
        assert_eq!(r.completed_at.as_deref(), Some("2026-08-08T08:05:00.000Z"));

        // Second complete is a no-op and keeps the first stamp.
        assert!(!r.complete("2026-08-08T09:00:00.000Z"));
        assert_eq!(r.completed_at.as_deref(), Some("2026-08-08T08:05:00.000Z"));
    }

    #[test]
    fn test_patch_cannot_flip_status() {
        let patch: ReminderPatch =
            serde_json::from_value(serde_json::json!({"status": "completed", "title": "renamed"}))
                .unwrap();
        let mut r = reminder();
        r.apply(patch);

        assert_eq!(r.status, ReminderStatus::Pending);
        assert_eq!(r.title, "renamed");
    }
}
