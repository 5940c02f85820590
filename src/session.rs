use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::services::auth_service::AuthService;

/// Outcome of opening a protected page.
#[derive(Debug)]
pub enum Access<'a> {
    Granted(&'a User),
    RedirectToLogin,
    Forbidden { role: Role },
}

/// The signed-in user, owned by the caller and handed to whatever needs it.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Asks the backend who is signed in. A 401 leaves the session empty
    /// instead of failing.
    pub async fn load(&mut self, auth: &AuthService) -> Result<Option<&User>> {
        match auth.me().await {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "Session loaded");
                self.user = Some(user);
            }
            Err(err) if err.is_unauthorized() => {
                self.user = None;
            }
            Err(err) => {
                warn!(error = %err, "Failed to load session");
                return Err(err);
            }
        }
        Ok(self.user.as_ref())
    }

    pub async fn login(&mut self, auth: &AuthService, email: &str, password: &str) -> Result<&User> {
        let user = auth.login(email, password).await?;
        Ok(self.user.insert(user))
    }

    /// Clears local state even when the logout call fails.
    pub async fn logout(&mut self, auth: &AuthService) -> Result<()> {
        let result = auth.logout().await;
        self.clear();
        if let Err(err) = &result {
            warn!(error = %err, "Logout call failed; session cleared locally");
        }
        result
    }

    pub fn clear(&mut self) {
        self.user = None;
    }

    /// Replaces the cached user after a profile update.
    pub fn refresh_user(&mut self, user: User) -> Result<()> {
        match &self.user {
            Some(current) if current.id == user.id => {
                self.user = Some(user);
                Ok(())
            }
            Some(_) => Err(Error::Forbidden(
                "Cannot replace the signed-in user with another account".to_string(),
            )),
            None => Err(Error::Unauthorized("Not authenticated".to_string())),
        }
    }

    pub fn access(&self, allowed: &[Role]) -> Access<'_> {
        match &self.user {
            None => Access::RedirectToLogin,
            Some(user) if allowed.is_empty() || allowed.contains(&user.role) => {
                Access::Granted(user)
            }
            Some(user) => Access::Forbidden { role: user.role },
        }
    }

    pub fn require(&self, allowed: &[Role]) -> Result<&User> {
        match self.access(allowed) {
            Access::Granted(user) => Ok(user),
            Access::RedirectToLogin => Err(Error::Unauthorized("Not authenticated".to_string())),
            Access::Forbidden { role } => Err(Error::Forbidden(format!(
                "{} accounts cannot open this page",
                role
            ))),
        }
    }

    pub fn home_path(&self) -> &'static str {
        self.role().map(|r| r.dashboard_path()).unwrap_or("/login")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> User {
        serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "name": "Dana",
            "email": "dana@firm.ae",
            "role": role
        }))
        .unwrap()
    }

    #[test]
    fn empty_session_redirects_to_login() {
        let session = Session::new();
        assert!(matches!(session.access(&[Role::Admin]), Access::RedirectToLogin));
        assert!(session.require(&[]).unwrap_err().is_unauthorized());
        assert_eq!(session.home_path(), "/login");
    }

    #[test]
    fn role_gates_pages() {
        let mut session = Session::new();
        session.user = Some(user("employee"));

        assert!(matches!(session.access(&[Role::Employee, Role::Admin]), Access::Granted(_)));
        assert!(matches!(
            session.access(&[Role::Admin]),
            Access::Forbidden { role: Role::Employee }
        ));
        assert_eq!(session.home_path(), "/employee/dashboard");

        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn refresh_keeps_the_same_account() {
        let mut session = Session::new();
        assert!(session.refresh_user(user("client")).is_err());

        session.user = Some(user("client"));
        let mut renamed = user("client");
        renamed.name = "Dana K.".into();
        session.refresh_user(renamed).unwrap();
        assert_eq!(session.current().unwrap().name, "Dana K.");
    }
}
