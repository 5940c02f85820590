use validator::Validate;

use crate::dto::auth_dto::{UpdatePasswordPayload, UpdateProfilePayload};
use crate::error::Result;
use crate::forms::{derive_errors, FormPolicy};
use crate::models::user::{Address, User};
use crate::utils::validation::validate_phone;

#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    pub address: Option<Address>,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
        }
    }

    pub fn check(&self) -> Result<()> {
        derive_errors(self).into_result()
    }

    pub fn to_payload(&self) -> UpdateProfilePayload {
        UpdateProfilePayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self
                .phone
                .as_ref()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            address: self.address.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    pub fn validate(&self, policy: &FormPolicy) -> Result<()> {
        let mut errors = crate::error::FieldErrors::new();
        if self.current_password.is_empty() {
            errors.add("currentPassword", "Current password is required");
        }
        policy.check_password(
            &mut errors,
            ("newPassword", &self.new_password),
            ("confirmPassword", &self.confirm_password),
        );
        if !self.current_password.is_empty() && self.current_password == self.new_password {
            errors.add(
                "newPassword",
                "New password must be different from the current password",
            );
        }
        errors.into_result()
    }

    pub fn to_payload(&self) -> UpdatePasswordPayload {
        UpdatePasswordPayload {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        }
    }
}
