use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::{Entity, Status};
use crate::models::ticket::Priority;
use crate::models::user::ActorRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }
}

// Tasks only move forward; cancelling is possible until the task is done.
impl Status for TaskStatus {
    const ALL: &'static [Self] = &[
        TaskStatus::Open,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Open, TaskStatus::InProgress)
                | (TaskStatus::InProgress, TaskStatus::Completed)
                | (TaskStatus::Open, TaskStatus::Cancelled)
                | (TaskStatus::InProgress, TaskStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskNote {
    pub note: String,
    pub added_by: Option<ActorRef>,
    pub added_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(flatten, with = "crate::models::document_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(default)]
    pub assigned_to: Option<ActorRef>,
    #[serde(default)]
    pub assigned_by: Option<ActorRef>,
    #[serde(default)]
    pub application_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub notes: Vec<TaskNote>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.due_date.is_some_and(|due| due < now)
    }

    pub fn latest_note(&self) -> Option<&TaskNote> {
        self.notes.last()
    }
}

impl Entity for Task {
    type Status = TaskStatus;

    const KIND: &'static str = "task";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        if let Some(actor) = &self.assigned_to {
            fields.push(actor.display_name());
        }
        fields
    }

    /// Tasks carry no category of their own; the task board's dropdown
    /// filters on priority, so this is the priority name.
    fn category(&self) -> Option<&str> {
        Some(self.priority.as_str())
    }

    fn label(&self) -> &str {
        &self.title
    }
}
