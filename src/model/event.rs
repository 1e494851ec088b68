//! Calendar event entity

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso, required, Recurrence};
use crate::types::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start_time: String,
    /// Defaults to `startTime` when absent on create.
    pub end_time: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub recurring: Option<Recurrence>,
    #[serde(default)]
    pub reminder: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Create input for `POST /api/events`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub recurring: Option<Recurrence>,
    pub reminder: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Update allow-list for `PATCH /api/events/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub recurring: Option<Recurrence>,
    pub reminder: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CalendarEvent {
    pub fn new(input: NewEvent) -> Result<Self> {
        let title = required(input.title, "title")?;
        let start_time = required(input.start_time, "startTime")?;
        let end_time = input.end_time.unwrap_or_else(|| start_time.clone());
        let now = now_iso();
        Ok(Self {
            id: new_id("event"),
            title,
            start_time,
            end_time,
            kind: input.kind,
            recurring: input.recurring,
            reminder: input.reminder,
            status: input.status,
            tags: input.tags.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: EventPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.start_time {
            self.start_time = v;
        }
        if let Some(v) = patch.end_time {
            self.end_time = v;
        }
        if let Some(v) = patch.kind {
            self.kind = Some(v);
        }
        if let Some(v) = patch.recurring {
            self.recurring = Some(v);
        }
        if let Some(v) = patch.reminder {
            self.reminder = Some(v);
        }
        if let Some(v) = patch.status {
            self.status = Some(v);
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_time_defaults_to_start_time() {
        let event = CalendarEvent::new(NewEvent {
            title: Some("Standup".to_string()),
            start_time: Some("2026-08-07T09:00:00.000Z".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(event.end_time, event.start_time);
        assert!(event.id.starts_with("event_"));
    }

    #[test]
    fn test_start_time_is_required() {
        let err = CalendarEvent::new(NewEvent {
            title: Some("Standup".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: startTime");
    }

    #[test]
    fn test_type_field_round_trips_under_wire_name() {
        let event = CalendarEvent::new(NewEvent {
            title: Some("1:1".to_string()),
            start_time: Some("2026-08-07T10:00:00.000Z".to_string()),
            kind: Some("meeting".to_string()),
            recurring: Some(Recurrence::Weekly),
            ..Default::default()
        })
        .unwrap();

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "meeting");
        assert_eq!(json["recurring"], "weekly");

        let back: CalendarEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind.as_deref(), Some("meeting"));
    }
}
