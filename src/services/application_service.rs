use tracing::info;

use crate::client::ApiClient;
use crate::dto::application_dto::{ApplicationListQuery, ApplicationPage, AssignEmployeesPayload};
use crate::dto::ticket_dto::StatusPayload;
use crate::error::Result;
use crate::lifecycle::LifecycleBackend;
use crate::models::application::{Application, ApplicationStatus};

#[derive(Clone)]
pub struct ApplicationService {
    client: ApiClient,
    page_size: u32,
}

impl ApplicationService {
    pub fn new(client: ApiClient, page_size: u32) -> Self {
        Self { client, page_size }
    }

    pub async fn list(&self, query: &ApplicationListQuery) -> Result<Vec<Application>> {
        let page: ApplicationPage = self.client.get_query(&["applications", "all"], query).await?;
        Ok(page.into_items())
    }

    /// First page at the configured page size; the portal does not page
    /// further.
    pub async fn all(&self) -> Result<Vec<Application>> {
        self.list(&ApplicationListQuery {
            limit: Some(self.page_size),
            ..Default::default()
        })
        .await
    }

    pub async fn get(&self, id: &str) -> Result<Application> {
        self.client.get(&["applications", id]).await
    }

    pub async fn assign_employees(&self, id: &str, employee_ids: &[&str]) -> Result<Application> {
        let application: Application = self
            .client
            .patch(
                &["applications", id, "assign"],
                &AssignEmployeesPayload {
                    employee_ids: employee_ids.to_vec(),
                },
            )
            .await?;
        info!(application_id = id, count = employee_ids.len(), "Employees assigned");
        Ok(application)
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
        note: Option<&str>,
    ) -> Result<Application> {
        self.client
            .patch(
                &["applications", id, "status"],
                &StatusPayload { status, note },
            )
            .await
    }
}

impl LifecycleBackend<Application> for ApplicationService {
    async fn fetch_all(&self) -> Result<Vec<Application>> {
        self.all().await
    }

    async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
        note: Option<&str>,
    ) -> Result<Application> {
        ApplicationService::update_status(self, id, status, note).await
    }

    async fn assign(&self, id: &str, actor_id: &str) -> Result<Application> {
        self.assign_employees(id, &[actor_id]).await
    }
}
