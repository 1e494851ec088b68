//! Task entity
//!
//! Workflow items with a four-state status and a priority scale. Assignee
//! defaults to "unassigned" so boards always have a column to render.

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso, required, Priority};
use crate::types::Result;

/// Workflow state of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default = "default_assignee")]
    pub assignee: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_assignee() -> String {
    "unassigned".to_string()
}

/// Create input for `POST /api/tasks`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

/// Update allow-list for `PATCH /api/tasks/{id}`
///
/// Fields outside this set are silently dropped, never rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

impl Task {
    /// Build a new task from create input, filling kind defaults.
    pub fn new(input: NewTask) -> Result<Self> {
        let title = required(input.title, "title")?;
        let now = now_iso();
        Ok(Self {
            id: new_id("task"),
            title,
            description: input.description.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            assignee: input.assignee.unwrap_or_else(default_assignee),
            priority: input.priority.unwrap_or_default(),
            tags: input.tags.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Overwrite allow-listed fields present in the patch.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.assignee {
            self.assignee = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
    }
}
