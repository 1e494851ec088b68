//! Calendar event repository
//!
//! Adds the date views on top of the uniform operations: today, upcoming,
//! and the inclusive date-range filter, all keyed on `startTime`.

use std::sync::Arc;

use serde_json::Value;

use super::{Collection, Record};
use crate::bus::{ChangeEvent, EventBus};
use crate::model::{now_iso, CalendarEvent, EventPatch, NewEvent};
use crate::store::CollectionStore;
use crate::types::Result;
use crate::views;

impl Record for CalendarEvent {
    const KIND: &'static str = "Event";
    const COLLECTION: &'static str = "events";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, stamp: String) {
        self.updated_at = stamp;
    }
}

pub struct EventRepository {
    collection: Collection<CalendarEvent>,
    bus: EventBus,
}

impl EventRepository {
    pub fn new(store: Arc<dyn CollectionStore>, bus: EventBus) -> Self {
        Self {
            collection: Collection::new(store),
            bus,
        }
    }

    pub async fn document(&self) -> Result<Value> {
        self.collection.document().await
    }

    pub async fn list(&self) -> Result<Vec<CalendarEvent>> {
        self.collection.list().await
    }

    pub async fn get(&self, id: &str) -> Result<CalendarEvent> {
        self.collection.get(id).await
    }

    pub async fn create(&self, input: NewEvent) -> Result<CalendarEvent> {
        let event = self.collection.insert(CalendarEvent::new(input)?).await?;
        self.bus
            .publish(ChangeEvent::EventCreated { event: event.clone() });
        Ok(event)
    }

    pub async fn update(&self, id: &str, patch: EventPatch) -> Result<CalendarEvent> {
        let event = self
            .collection
            .update_with(id, |event, _| event.apply(patch))
            .await?;
        self.bus
            .publish(ChangeEvent::EventUpdated { event: event.clone() });
        Ok(event)
    }

    pub async fn delete(&self, id: &str) -> Result<CalendarEvent> {
        let event = self.collection.remove(id).await?;
        self.bus
            .publish(ChangeEvent::EventDeleted { id: event.id.clone() });
        Ok(event)
    }

    /// Events starting today (UTC date prefix).
    pub async fn today(&self) -> Result<Vec<CalendarEvent>> {
        let events = self.collection.list().await?;
        let now = now_iso();
        Ok(cloned(views::today(&events, &now, |e| e.start_time.as_str())))
    }

    /// The next `limit` events at/after now, ascending by start time.
    pub async fn upcoming(&self, limit: usize) -> Result<Vec<CalendarEvent>> {
        let events = self.collection.list().await?;
        let now = now_iso();
        Ok(cloned(views::upcoming(&events, &now, limit, |e| {
            e.start_time.as_str()
        })))
    }

    /// Events with `startTime` inside the inclusive `[from, to]` range.
    pub async fn in_range(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<CalendarEvent>> {
        let events = self.collection.list().await?;
        Ok(cloned(views::in_range(&events, from, to, |e| {
            e.start_time.as_str()
        })))
    }
}

fn cloned(events: Vec<&CalendarEvent>) -> Vec<CalendarEvent> {
    events.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repo() -> EventRepository {
        EventRepository::new(Arc::new(MemoryStore::new()), EventBus::new())
    }

    async fn seed(repo: &EventRepository, title: &str, start: &str) -> CalendarEvent {
        repo.create(NewEvent {
            title: Some(title.to_string()),
            start_time: Some(start.to_string()),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_upcoming_orders_by_start_time() {
        let repo = repo();
        // Far-future stamps keep the view deterministic regardless of the
        // test's wall clock.
        seed(&repo, "later", "2199-01-03T10:00:00.000Z").await;
        seed(&repo, "soon", "2199-01-01T10:00:00.000Z").await;
        seed(&repo, "middle", "2199-01-02T10:00:00.000Z").await;

        let hits = repo.upcoming(2).await.unwrap();
        let titles: Vec<&str> = hits.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["soon", "middle"]);
    }

    #[tokio::test]
    async fn test_range_filter_is_inclusive() {
        let repo = repo();
        seed(&repo, "a", "2199-01-01T10:00:00.000Z").await;
        seed(&repo, "b", "2199-01-02T10:00:00.000Z").await;

        let hits = repo
            .in_range(Some("2199-01-01T10:00:00.000Z"), Some("2199-01-01T23:59:59.999Z"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "a");
    }

    #[tokio::test]
    async fn test_end_time_defaults_survive_persistence() {
        let repo = repo();
        let created = seed(&repo, "standup", "2199-01-01T09:00:00.000Z").await;
        let fetched = repo.get(&created.id).await.unwrap();
        assert_eq!(fetched.end_time, "2199-01-01T09:00:00.000Z");
    }
}
