use crate::client::ApiClient;
use crate::dto::auth_dto::{UpdateUserPayload, UserPayload};
use crate::error::Result;
use crate::models::user::{Role, User};

#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.client.get(&["users"]).await
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        let user: UserPayload = self.client.get(&["users", id]).await?;
        Ok(user.into())
    }

    pub async fn by_role(&self, role: Role) -> Result<Vec<User>> {
        self.client.get(&["users", "role", role.as_str()]).await
    }

    pub async fn update(&self, id: &str, payload: &UpdateUserPayload) -> Result<User> {
        let user: UserPayload = self.client.put(&["users", id], payload).await?;
        Ok(user.into())
    }
}
