//! Task repository

use std::sync::Arc;

use serde_json::Value;

use super::{Collection, Record};
use crate::bus::{ChangeEvent, EventBus};
use crate::model::{NewTask, Task, TaskPatch};
use crate::store::CollectionStore;
use crate::types::Result;

impl Record for Task {
    const KIND: &'static str = "Task";
    const COLLECTION: &'static str = "tasks";

    fn id(&self) -> &str {
        &self.id
    }

    fn touch(&mut self, stamp: String) {
        self.updated_at = stamp;
    }
}

pub struct TaskRepository {
    collection: Collection<Task>,
    bus: EventBus,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn CollectionStore>, bus: EventBus) -> Self {
        Self {
            collection: Collection::new(store),
            bus,
        }
    }

    pub async fn document(&self) -> Result<Value> {
        self.collection.document().await
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        self.collection.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Task> {
        self.collection.get(id).await
    }

    pub async fn create(&self, input: NewTask) -> Result<Task> {
        let task = self.collection.insert(Task::new(input)?).await?;
        self.bus.publish(ChangeEvent::TaskCreated { task: task.clone() });
        Ok(task)
    }

    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let task = self
            .collection
            .update_with(id, |task, _| task.apply(patch))
            .await?;
        self.bus.publish(ChangeEvent::TaskUpdated { task: task.clone() });
        Ok(task)
    }

    pub async fn delete(&self, id: &str) -> Result<Task> {
        let task = self.collection.remove(id).await?;
        self.bus.publish(ChangeEvent::TaskDeleted { id: task.id.clone() });
        Ok(task)
    }

    /// Exact-match status/assignee filters over a fresh load.
    pub async fn filtered(
        &self,
        status: Option<&str>,
        assignee: Option<&str>,
    ) -> Result<Vec<Task>> {
        let tasks = self.collection.list().await?;
        Ok(tasks
            .into_iter()
            .filter(|t| status.map_or(true, |s| t.status.as_str() == s))
            .filter(|t| assignee.map_or(true, |a| t.assignee == a))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use crate::store::MemoryStore;

    fn repo() -> (TaskRepository, EventBus) {
        let bus = EventBus::new();
        let repo = TaskRepository::new(Arc::new(MemoryStore::new()), bus.clone());
        (repo, bus)
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let (repo, _bus) = repo();
        let created = repo
            .create(NewTask {
                title: Some("Build UI".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let fetched = repo.get(&created.id).await.unwrap();
        assert_eq!(fetched.title, "Build UI");
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_eq!(fetched.assignee, "unassigned");
    }

    #[tokio::test]
    async fn test_list_is_idempotent_and_insertion_ordered() {
        let (repo, _bus) = repo();
        for title in ["a", "b", "c"] {
            repo.create(NewTask {
                title: Some(title.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let first = repo.list().await.unwrap();
        let second = repo.list().await.unwrap();
        let titles: Vec<&str> = first.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
        assert_eq!(
            first.iter().map(|t| &t.id).collect::<Vec<_>>(),
            second.iter().map(|t| &t.id).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_only() {
        let (repo, _bus) = repo();
        let created = repo
            .create(NewTask {
                title: Some("t".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        // Keep the stamps distinguishable.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let updated = repo
            .update(
                &created.id,
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_delete_removes_exactly_one() {
        let (repo, _bus) = repo();
        let keep = repo
            .create(NewTask {
                title: Some("keep".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let gone = repo
            .create(NewTask {
                title: Some("gone".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let deleted = repo.delete(&gone.id).await.unwrap();
        assert_eq!(deleted.id, gone.id);

        let err = repo.get(&gone.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Task not found");

        let remaining = repo.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_mutations_notify_every_live_subscriber() {
        let (repo, bus) = repo();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let created = repo
            .create(NewTask {
                title: Some("Build UI".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        for rx in [&mut first, &mut second] {
            match rx.try_recv().unwrap() {
                ChangeEvent::TaskCreated { task } => assert_eq!(task.id, created.id),
                other => panic!("unexpected event: {:?}", other),
            }
            assert!(rx.try_recv().is_err());
        }

        // A subscriber connected after the mutation receives nothing.
        let mut late = bus.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_filters_are_exact_match() {
        let (repo, _bus) = repo();
        repo.create(NewTask {
            title: Some("a".to_string()),
            assignee: Some("ada".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        repo.create(NewTask {
            title: Some("b".to_string()),
            status: Some(TaskStatus::Done),
            ..Default::default()
        })
        .await
        .unwrap();

        let done = repo.filtered(Some("done"), None).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "b");

        let ada = repo.filtered(None, Some("ada")).await.unwrap();
        assert_eq!(ada.len(), 1);
        assert_eq!(ada[0].title, "a");

        // "in_progres" matches nothing rather than prefix-matching.
        assert!(repo.filtered(Some("in_progres"), None).await.unwrap().is_empty());
    }
}
