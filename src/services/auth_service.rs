use serde_json::{json, Value as JsonValue};
use tracing::{info, instrument};
use validator::Validate;

use crate::client::ApiClient;
use crate::dto::auth_dto::{LoginPayload, UserPayload};
use crate::error::Result;
use crate::forms::profile::{PasswordForm, ProfileForm};
use crate::forms::registration::{RegistrationForm, SignUpForm};
use crate::forms::FormPolicy;
use crate::models::user::{User, UserSettings};

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    policy: FormPolicy,
}

impl AuthService {
    pub fn new(client: ApiClient, policy: FormPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &FormPolicy {
        &self.policy
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let payload = LoginPayload {
            email: email.trim().to_lowercase(),
            password: password.to_string(),
        };
        payload.validate()?;

        let user: UserPayload = self.client.post(&["auth", "login"], &payload).await?;
        let user = User::from(user);
        info!(user_id = %user.id, role = %user.role, "Logged in");
        Ok(user)
    }

    pub async fn logout(&self) -> Result<()> {
        let _: JsonValue = self.client.post(&["auth", "logout"], &json!({})).await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<User> {
        let user: UserPayload = self.client.get(&["auth", "me"]).await?;
        Ok(user.into())
    }

    /// Client self-registration. Invalid forms never reach the network.
    #[instrument(skip(self, form), fields(email = %form.account.email))]
    pub async fn register(&self, form: &SignUpForm) -> Result<User> {
        form.validate(&self.policy)?;
        let user: UserPayload = self.client.post(&["auth", "register"], &form.to_payload()).await?;
        Ok(user.into())
    }

    /// Creates an employee or admin account.
    #[instrument(skip(self, form), fields(role = %form.role()))]
    pub async fn create_user(&self, form: &RegistrationForm) -> Result<User> {
        form.validate(&self.policy)?;
        let payload = form.to_create_user_payload()?;
        let user: UserPayload = self.client.post(&["auth", "create-user"], &payload).await?;
        let user = User::from(user);
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let _: JsonValue = self.client.delete(&["auth", "users", id]).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> Result<User> {
        form.check()?;
        let user: UserPayload = self
            .client
            .put(&["auth", "update-profile"], &form.to_payload())
            .await?;
        Ok(user.into())
    }

    pub async fn update_password(&self, form: &PasswordForm) -> Result<()> {
        form.validate(&self.policy)?;
        let _: JsonValue = self
            .client
            .put(&["auth", "update-password"], &form.to_payload())
            .await?;
        Ok(())
    }

    pub async fn update_settings(&self, settings: &UserSettings) -> Result<()> {
        let _: JsonValue = self.client.put(&["auth", "update-settings"], settings).await?;
        Ok(())
    }
}
