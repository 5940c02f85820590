use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::lifecycle::{Entity, Status};
use crate::models::application::Application;
use crate::models::task::Task;
use crate::models::user::User;
use crate::services::application_service::ApplicationService;
use crate::services::directory_service::DirectoryService;
use crate::services::task_service::TaskService;

#[derive(Debug, Clone)]
pub struct TaskBoard {
    pub tasks: Vec<Task>,
    pub employees: Vec<User>,
    pub applications: Vec<Application>,
}

#[derive(Debug, Clone)]
pub struct ClientOverview {
    pub clients: Vec<User>,
    pub applications: Vec<Application>,
}

impl ClientOverview {
    pub fn applications_for<'a>(&'a self, client: &'a User) -> impl Iterator<Item = &'a Application> {
        self.applications
            .iter()
            .filter(move |a| a.client.email.eq_ignore_ascii_case(&client.email))
    }
}

/// Loads the independent reads behind a dashboard page concurrently.
#[derive(Clone)]
pub struct DashboardService {
    tasks: TaskService,
    directory: DirectoryService,
    applications: ApplicationService,
}

impl DashboardService {
    pub fn new(
        tasks: TaskService,
        directory: DirectoryService,
        applications: ApplicationService,
    ) -> Self {
        Self {
            tasks,
            directory,
            applications,
        }
    }

    pub async fn task_board(&self) -> Result<TaskBoard> {
        let (tasks, employees, applications) = tokio::try_join!(
            self.tasks.list(),
            self.directory.employees(),
            self.applications.all(),
        )?;
        info!(
            tasks = tasks.len(),
            employees = employees.len(),
            applications = applications.len(),
            "Task board loaded"
        );
        Ok(TaskBoard {
            tasks,
            employees,
            applications,
        })
    }

    pub async fn client_overview(&self) -> Result<ClientOverview> {
        let (clients, applications) =
            tokio::try_join!(self.directory.clients(), self.applications.all())?;
        Ok(ClientOverview {
            clients,
            applications,
        })
    }
}

/// Count per status, including statuses with no entities.
pub fn status_counts<E: Entity>(items: &[E]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> =
        <E::Status as Status>::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for item in items {
        *counts.entry(item.status().as_str()).or_default() += 1;
    }
    counts
}

pub fn overdue_tasks(tasks: &[Task], now: DateTime<Utc>) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_overdue(now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;
    use crate::models::ticket::Priority;
    use crate::utils::time::from_rfc3339;

    fn task(id: &str, status: TaskStatus, due: Option<&str>) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {}", id),
            description: String::new(),
            priority: Priority::Low,
            status,
            assigned_to: None,
            assigned_by: None,
            application_id: None,
            due_date: due.map(|d| from_rfc3339(d).unwrap()),
            estimated_hours: None,
            notes: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn counts_include_empty_statuses() {
        let tasks = vec![
            task("1", TaskStatus::Open, None),
            task("2", TaskStatus::Open, None),
            task("3", TaskStatus::Completed, None),
        ];
        let counts = status_counts(&tasks);
        assert_eq!(counts["open"], 2);
        assert_eq!(counts["completed"], 1);
        assert_eq!(counts["in_progress"], 0);
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn overdue_only_counts_unfinished_work() {
        let now = from_rfc3339("2025-06-01T00:00:00Z").unwrap();
        let tasks = vec![
            task("1", TaskStatus::InProgress, Some("2025-05-01T00:00:00Z")),
            task("2", TaskStatus::Completed, Some("2025-05-01T00:00:00Z")),
            task("3", TaskStatus::Open, Some("2025-07-01T00:00:00Z")),
        ];
        let overdue: Vec<_> = overdue_tasks(&tasks, now).into_iter().map(|t| t.id.as_str()).collect();
        assert_eq!(overdue, vec!["1"]);
    }
}
