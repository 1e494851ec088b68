//! Entity types for the four collections plus the team and settings documents
//!
//! All API-facing types serialize with camelCase keys. Shared record fields:
//! a type-prefixed id, equal `createdAt`/`updatedAt` at creation, and a
//! free-form ordered `tags` sequence.

pub mod cron;
pub mod event;
pub mod reminder;
pub mod settings;
pub mod task;
pub mod team;

pub use cron::{CronJob, CronPatch, NewCronJob};
pub use event::{CalendarEvent, EventPatch, NewEvent};
pub use reminder::{NewReminder, Reminder, ReminderPatch, ReminderStatus};
pub use settings::{Settings, SettingsPatch};
pub use task::{NewTask, Task, TaskPatch, TaskStatus};
pub use team::{Agent, NewAgent, TeamDocument};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{HearthError, Result};

/// Current instant as ISO-8601 UTC with millisecond precision and `Z` suffix.
///
/// The format is zero-padded, so lexical order on these strings matches
/// chronological order. All date views rely on that.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Type-prefixed collision-resistant id, e.g. `task_2f6e...`.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4())
}

/// Priority scale shared by tasks and reminders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Recurrence rule shared by calendar events and reminders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

/// Extract a required create field, rejecting absent or blank values.
pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(HearthError::Validation(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_carries_prefix_and_is_unique() {
        let a = new_id("task");
        let b = new_id("task");
        assert!(a.starts_with("task_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_now_iso_is_utc_zero_padded() {
        let now = now_iso();
        assert!(now.ends_with('Z'));
        // YYYY-MM-DDTHH:MM:SS.mmmZ
        assert_eq!(&now[4..5], "-");
        assert_eq!(&now[10..11], "T");
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(Some("  ".to_string()), "title").is_err());
        assert!(required(None, "title").is_err());
        assert_eq!(required(Some("ok".to_string()), "title").unwrap(), "ok");
    }

    #[test]
    fn test_priority_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Priority::Urgent).unwrap(), r#""urgent""#);
        assert_eq!(serde_json::to_string(&Recurrence::Weekly).unwrap(), r#""weekly""#);
    }
}
