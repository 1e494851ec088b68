//! Change notifier
//!
//! Repositories publish typed domain events here; the WebSocket transport
//! fans them out to live connections. Delivery is best-effort and
//! fire-and-forget: a slow, closed, or erroring subscriber never blocks or
//! fails the publishing mutation, and there is no replay - a subscriber that
//! connects after an event missed it permanently (new connections get a
//! one-time snapshot instead).

use serde::Serialize;
use tokio::sync::broadcast;

use crate::model::{Agent, CalendarEvent, CronJob, Reminder, Settings, Task};

/// Broadcast payload for every successful mutation.
///
/// Serializes as `{"type": "<EVENT_TYPE>", "<entityKey>": <entity-or-id>}`;
/// deletes carry only the id.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ChangeEvent {
    #[serde(rename = "TASK_CREATED")]
    TaskCreated { task: Task },
    #[serde(rename = "TASK_UPDATED")]
    TaskUpdated { task: Task },
    #[serde(rename = "TASK_DELETED")]
    TaskDeleted { id: String },

    #[serde(rename = "EVENT_CREATED")]
    EventCreated { event: CalendarEvent },
    #[serde(rename = "EVENT_UPDATED")]
    EventUpdated { event: CalendarEvent },
    #[serde(rename = "EVENT_DELETED")]
    EventDeleted { id: String },

    #[serde(rename = "CRON_CREATED")]
    CronCreated { job: CronJob },
    #[serde(rename = "CRON_UPDATED")]
    CronUpdated { job: CronJob },
    #[serde(rename = "CRON_DELETED")]
    CronDeleted { id: String },
    #[serde(rename = "CRON_RUN")]
    CronRun { job: CronJob },

    #[serde(rename = "REMINDER_CREATED")]
    ReminderCreated { reminder: Reminder },
    #[serde(rename = "REMINDER_UPDATED")]
    ReminderUpdated { reminder: Reminder },
    #[serde(rename = "REMINDER_DELETED")]
    ReminderDeleted { id: String },
    #[serde(rename = "REMINDER_COMPLETED")]
    ReminderCompleted { reminder: Reminder },

    #[serde(rename = "AGENT_CREATED")]
    AgentCreated { agent: Agent },
    #[serde(rename = "AGENT_SPAWNED")]
    AgentSpawned { agent: Agent },
    #[serde(rename = "AGENT_DISMISSED")]
    AgentDismissed { agent: Agent },

    /// Always carries the masked settings document.
    #[serde(rename = "CONFIG_UPDATED")]
    ConfigUpdated { config: Settings },
}

/// Hub connecting repositories to realtime subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Best-effort publish; send errors (no subscribers) are ignored.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewTask;

    fn task() -> Task {
        Task::new(NewTask {
            title: Some("Build UI".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_event_serializes_with_type_tag_and_entity_key() {
        let event = ChangeEvent::TaskCreated { task: task() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TASK_CREATED");
        assert_eq!(json["task"]["title"], "Build UI");
    }

    #[test]
    fn test_delete_event_carries_id_only() {
        let event = ChangeEvent::TaskDeleted {
            id: "task_1".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TASK_DELETED");
        assert_eq!(json["id"], "task_1");
        assert!(json.get("task").is_none());
    }

    #[tokio::test]
    async fn test_fan_out_reaches_every_live_subscriber() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(ChangeEvent::TaskCreated { task: task() });

        assert!(matches!(
            first.try_recv().unwrap(),
            ChangeEvent::TaskCreated { .. }
        ));
        assert!(matches!(
            second.try_recv().unwrap(),
            ChangeEvent::TaskCreated { .. }
        ));
        // Exactly one delivery each.
        assert!(first.try_recv().is_err());
        assert!(second.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(ChangeEvent::TaskDeleted {
            id: "task_1".to_string(),
        });

        let mut late = bus.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_panic() {
        let bus = EventBus::new();
        bus.publish(ChangeEvent::TaskDeleted {
            id: "task_1".to_string(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
