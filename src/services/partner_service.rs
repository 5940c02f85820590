use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::dto::auth_dto::UserPayload;
use crate::error::Result;
use crate::forms::registration::RegistrationForm;
use crate::forms::FormPolicy;
use crate::models::user::User;

#[derive(Clone)]
pub struct PartnerService {
    client: ApiClient,
    policy: FormPolicy,
}

impl PartnerService {
    pub fn new(client: ApiClient, policy: FormPolicy) -> Self {
        Self { client, policy }
    }

    /// Registers a partner together with their documents.
    #[instrument(skip(self, form), fields(email = %form.account.email))]
    pub async fn register(&self, form: RegistrationForm) -> Result<User> {
        form.validate(&self.policy)?;
        let multipart = form.into_partner_multipart()?;
        let user: UserPayload = self.client.post_multipart(&["partners"], multipart).await?;
        let user = User::from(user);
        info!(user_id = %user.id, "Partner registered");
        Ok(user)
    }
}
