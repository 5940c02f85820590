use serde_json::{json, Value as JsonValue};

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::notification::Notification;

#[derive(Clone)]
pub struct NotificationService {
    client: ApiClient,
}

impl NotificationService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Notification>> {
        self.client.get(&["notifications"]).await
    }

    pub async fn mark_read(&self, id: &str) -> Result<()> {
        let _: JsonValue = self
            .client
            .patch(&["notifications", id, "read"], &json!({}))
            .await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        let _: JsonValue = self.client.delete(&["notifications", "clear"]).await?;
        Ok(())
    }
}

/// Marks one notification read in a locally held list.
pub fn apply_read(notifications: &mut [Notification], id: &str) -> bool {
    match notifications.iter_mut().find(|n| n.id == id) {
        Some(n) => {
            n.read = true;
            true
        }
        None => false,
    }
}
