use crate::client::ApiClient;
use crate::error::Result;
use crate::models::user::User;

/// Employee and client lookups used to populate pickers.
#[derive(Clone)]
pub struct DirectoryService {
    client: ApiClient,
}

impl DirectoryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn employees(&self) -> Result<Vec<User>> {
        self.client.get(&["employees"]).await
    }

    pub async fn clients(&self) -> Result<Vec<User>> {
        self.client.get(&["clients"]).await
    }
}
