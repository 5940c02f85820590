pub mod profile;
pub mod registration;

use validator::Validate;

use crate::config::{Config, DEFAULT_MIN_PASSWORD_LEN};
use crate::error::FieldErrors;
use crate::utils::validation::validate;

/// Limits applied to forms before anything is sent.
#[derive(Debug, Clone, Copy)]
pub struct FormPolicy {
    pub min_password_len: usize,
}

impl Default for FormPolicy {
    fn default() -> Self {
        Self {
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
        }
    }
}

impl FormPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_password_len: config.min_password_len,
        }
    }

    pub(crate) fn check_password(
        &self,
        errors: &mut FieldErrors,
        (field, password): (&str, &str),
        (confirm_field, confirm): (&str, &str),
    ) {
        if password.is_empty() {
            errors.add(field, "Password is required");
        } else if password.chars().count() < self.min_password_len {
            errors.add(
                field,
                format!(
                    "Password must be at least {} characters",
                    self.min_password_len
                ),
            );
        }

        if confirm.is_empty() {
            errors.add(confirm_field, "Please confirm your password");
        } else if password != confirm {
            errors.add(confirm_field, "Passwords do not match");
        }
    }
}

pub(crate) fn derive_errors<T: Validate>(value: &T) -> FieldErrors {
    match validate(value) {
        Ok(()) => FieldErrors::new(),
        Err(errors) => FieldErrors::from(&errors),
    }
}
