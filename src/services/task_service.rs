use tracing::info;
use validator::Validate;

use crate::client::ApiClient;
use crate::dto::task_dto::CreateTaskPayload;
use crate::dto::ticket_dto::StatusPayload;
use crate::error::Result;
use crate::lifecycle::LifecycleBackend;
use crate::models::task::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    All,
    Mine,
}

#[derive(Clone)]
pub struct TaskService {
    client: ApiClient,
    scope: TaskScope,
}

impl TaskService {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            scope: TaskScope::All,
        }
    }

    /// Same service, listing only the tasks assigned to the current user.
    pub fn mine(&self) -> Self {
        Self {
            client: self.client.clone(),
            scope: TaskScope::Mine,
        }
    }

    pub fn scope(&self) -> TaskScope {
        self.scope
    }

    pub async fn list(&self) -> Result<Vec<Task>> {
        match self.scope {
            TaskScope::All => self.client.get(&["tasks"]).await,
            TaskScope::Mine => self.client.get(&["tasks", "my-tasks"]).await,
        }
    }

    pub async fn create(&self, payload: &CreateTaskPayload) -> Result<Task> {
        payload.validate()?;
        let task: Task = self.client.post(&["tasks"], payload).await?;
        info!(task_id = %task.id, assigned_to = %payload.assigned_to, "Task created");
        Ok(task)
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: TaskStatus,
        note: Option<&str>,
    ) -> Result<Task> {
        self.client
            .patch(
                &["tasks", id, "status"],
                &StatusPayload { status, note },
            )
            .await
    }
}

impl LifecycleBackend<Task> for TaskService {
    async fn fetch_all(&self) -> Result<Vec<Task>> {
        self.list().await
    }

    async fn update_status(
        &self,
        id: &str,
        status: TaskStatus,
        note: Option<&str>,
    ) -> Result<Task> {
        TaskService::update_status(self, id, status, note).await
    }
}
