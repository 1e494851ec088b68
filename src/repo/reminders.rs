//! Reminder repository

use std::sync::Arc;

use serde_json::Value;

use super::{Collection, Record};
use crate::bus::{ChangeEvent, EventBus};
use crate::model::{now_iso, NewReminder, Reminder, ReminderPatch, ReminderStatus};
use crate::store::CollectionStore;
use crate::types::Result;
use crate::views;

impl Record for Reminder {
    const KIND: &'static str = "Reminder";
    const COLLECTION: &'static str = "reminders";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, stamp: String) {
        self.updated_at = stamp;
    }
}

pub struct ReminderRepository {
    collection: Collection<Reminder>,
    bus: EventBus,
}

impl ReminderRepository {
    pub fn new(store: Arc<dyn CollectionStore>, bus: EventBus) -> Self {
        Self {
            collection: Collection::new(store),
            bus,
        }
    }

    pub async fn document(&self) -> Result<Value> {
        self.collection.document().await
    }

    pub async fn list(&self) -> Result<Vec<Reminder>> {
        self.collection.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Reminder> {
        self.collection.get(id).await
    }

    pub async fn create(&self, input: NewReminder) -> Result<Reminder> {
        let reminder = self.collection.insert(Reminder::new(input)?).await?;
        self.bus.publish(ChangeEvent::ReminderCreated {
            reminder: reminder.clone(),
        });
        Ok(reminder)
    }

    pub async fn update(&self, id: &str, patch: ReminderPatch) -> Result<Reminder> {
        let reminder = self
            .collection
            .update_with(id, |reminder, _| reminder.apply(patch))
            .await?;
        self.bus.publish(ChangeEvent::ReminderUpdated {
            reminder: reminder.clone(),
        });
        Ok(reminder)
    }

    pub async fn delete(&self, id: &str) -> Result<Reminder> {
        let reminder = self.collection.remove(id).await?;
        self.bus.publish(ChangeEvent::ReminderDeleted {
            id: reminder.id.clone(),
        });
        Ok(reminder)
    }

    /// One-way pending → completed flip. Completing an already-completed
    /// reminder returns it unchanged and broadcasts nothing.
    pub async fn complete(&self, id: &str) -> Result<Reminder> {
        let (reminder, changed) = self
            .collection
            .update_if(id, |reminder, stamp| reminder.complete(stamp))
            .await?;
        if changed {
            self.bus.publish(ChangeEvent::ReminderCompleted {
                reminder: reminder.clone(),
            });
        }
        Ok(reminder)
    }

    /// The next `limit` pending reminders at/after now, ascending by
    /// `remindAt`.
    pub async fn upcoming(&self, limit: usize) -> Result<Vec<Reminder>> {
        let reminders = self.collection.list().await?;
        let pending: Vec<Reminder> = reminders
            .into_iter()
            .filter(|r| r.status == ReminderStatus::Pending)
            .collect();
        let now = now_iso();
        Ok(views::upcoming(&pending, &now, limit, |r| r.remind_at.as_str())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Reminders with `remindAt` inside the inclusive `[from, to]` range.
    pub async fn in_range(&self, from: Option<&str>, to: Option<&str>) -> Result<Vec<Reminder>> {
        let reminders = self.collection.list().await?;
        Ok(views::in_range(&reminders, from, to, |r| r.remind_at.as_str())
            .into_iter()
            .cloned()
            .collect())
    }
}
