use serde_json::Value as JsonValue;
use tracing::info;
use validator::Validate;

use crate::client::ApiClient;
use crate::dto::ticket_dto::{AssignPayload, CreateTicketPayload, StatusPayload};
use crate::error::Result;
use crate::lifecycle::LifecycleBackend;
use crate::models::ticket::{Ticket, TicketStatus};

#[derive(Clone)]
pub struct TicketService {
    client: ApiClient,
}

impl TicketService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Ticket>> {
        self.client.get(&["tickets"]).await
    }

    pub async fn create(&self, payload: &CreateTicketPayload) -> Result<Ticket> {
        payload.validate()?;
        let ticket: Ticket = self.client.post(&["tickets"], payload).await?;
        info!(ticket_id = %ticket.id, "Ticket created");
        Ok(ticket)
    }

    pub async fn assign(&self, id: &str, employee_id: &str) -> Result<Ticket> {
        self.client
            .patch(
                &["tickets", id, "assign"],
                &AssignPayload {
                    assigned_to: employee_id,
                },
            )
            .await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: TicketStatus,
        note: Option<&str>,
    ) -> Result<Ticket> {
        self.client
            .patch(
                &["tickets", id, "status"],
                &StatusPayload { status, note },
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _: JsonValue = self.client.delete(&["tickets", id]).await?;
        Ok(())
    }
}

impl LifecycleBackend<Ticket> for TicketService {
    async fn fetch_all(&self) -> Result<Vec<Ticket>> {
        self.list().await
    }

    async fn update_status(
        &self,
        id: &str,
        status: TicketStatus,
        note: Option<&str>,
    ) -> Result<Ticket> {
        TicketService::update_status(self, id, status, note).await
    }

    async fn assign(&self, id: &str, actor_id: &str) -> Result<Ticket> {
        TicketService::assign(self, id, actor_id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        TicketService::delete(self, id).await
    }
}
