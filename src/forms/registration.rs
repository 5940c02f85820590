use reqwest::multipart::Form;
use validator::Validate;

use crate::dto::auth_dto::{CreateUserPayload, SignUpPayload};
use crate::dto::upload_dto::Attachment;
use crate::error::{Error, FieldErrors, Result};
use crate::forms::{derive_errors, FormPolicy};
use crate::models::user::Role;
use crate::utils::validation::validate_phone;

#[derive(Debug, Clone, Default, Validate)]
pub struct AccountFields {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl AccountFields {
    fn check(&self, policy: &FormPolicy) -> FieldErrors {
        let mut errors = derive_errors(self);
        policy.check_password(
            &mut errors,
            ("password", &self.password),
            ("confirmPassword", &self.confirm_password),
        );
        errors
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct EmployeeDetails {
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct PartnerDetails {
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "Partner type is required"))]
    pub partner_type: String,
    #[validate(length(min = 1, message = "Trade license number is required"))]
    pub trade_license_number: String,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    #[validate(length(min = 15, max = 34, message = "IBAN must be 15 to 34 characters"))]
    pub iban: Option<String>,
    pub documents: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct AdminDetails {
    pub permissions: Vec<String>,
}

/// Role-specific part of the add-user form.
#[derive(Debug, Clone)]
pub enum RoleDetails {
    Employee(EmployeeDetails),
    Partner(PartnerDetails),
    Admin(AdminDetails),
}

impl RoleDetails {
    pub fn role(&self) -> Role {
        match self {
            RoleDetails::Employee(_) => Role::Employee,
            RoleDetails::Partner(_) => Role::Partner,
            RoleDetails::Admin(_) => Role::Admin,
        }
    }

    fn check(&self) -> FieldErrors {
        match self {
            RoleDetails::Employee(details) => derive_errors(details),
            RoleDetails::Partner(details) => {
                let mut errors = derive_errors(details);
                if details.bank_name.is_some() != details.account_number.is_some() {
                    errors.add(
                        "accountNumber",
                        "Bank name and account number must be provided together",
                    );
                }
                errors
            }
            RoleDetails::Admin(details) => derive_errors(details),
        }
    }
}

/// Add-user form used by admins to create employees, partners and admins.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub account: AccountFields,
    pub details: RoleDetails,
}

impl RegistrationForm {
    pub fn validate(&self, policy: &FormPolicy) -> Result<()> {
        let mut errors = self.account.check(policy);
        errors.merge(self.details.check());
        errors.into_result()
    }

    pub fn role(&self) -> Role {
        self.details.role()
    }

    /// JSON body for `/auth/create-user`; partners go through multipart.
    pub fn to_create_user_payload(&self) -> Result<CreateUserPayload> {
        let (department, position, permissions) = match &self.details {
            RoleDetails::Employee(d) => (Some(d.department.clone()), Some(d.position.clone()), None),
            RoleDetails::Admin(d) => (None, None, Some(d.permissions.clone())),
            RoleDetails::Partner(_) => {
                return Err(Error::Unsupported(
                    "Partners are registered with their documents".to_string(),
                ))
            }
        };

        Ok(CreateUserPayload {
            name: self.account.name.trim().to_string(),
            email: self.account.email.trim().to_lowercase(),
            phone: self.account.phone.trim().to_string(),
            password: self.account.password.clone(),
            role: self.role(),
            department,
            position,
            permissions,
        })
    }

    pub fn into_partner_multipart(self) -> Result<Form> {
        let role = self.details.role();
        let RoleDetails::Partner(details) = self.details else {
            return Err(Error::Unsupported(format!(
                "{} accounts are not created through the partner endpoint",
                role
            )));
        };

        let mut form = Form::new()
            .text("name", self.account.name.trim().to_string())
            .text("email", self.account.email.trim().to_lowercase())
            .text("phone", self.account.phone.trim().to_string())
            .text("password", self.account.password)
            .text("role", Role::Partner.as_str())
            .text("companyName", details.company_name)
            .text("partnerType", details.partner_type)
            .text("tradeLicenseNumber", details.trade_license_number);

        if let Some(bank_name) = details.bank_name {
            form = form.text("bankName", bank_name);
        }
        if let Some(account_number) = details.account_number {
            form = form.text("accountNumber", account_number);
        }
        if let Some(iban) = details.iban {
            form = form.text("iban", iban);
        }
        for document in details.documents {
            form = form.part("documents", document.into_part()?);
        }
        Ok(form)
    }
}

/// Public sign-up form for clients.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub account: AccountFields,
    pub nationality: Option<String>,
}

impl SignUpForm {
    pub fn validate(&self, policy: &FormPolicy) -> Result<()> {
        self.account.check(policy).into_result()
    }

    pub fn to_payload(&self) -> SignUpPayload {
        SignUpPayload {
            name: self.account.name.trim().to_string(),
            email: self.account.email.trim().to_lowercase(),
            phone: self.account.phone.trim().to_string(),
            password: self.account.password.clone(),
            nationality: self
                .nationality
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(password: &str, confirm: &str) -> AccountFields {
        AccountFields {
            name: "Huda Saleh".into(),
            email: "huda@firm.ae".into(),
            phone: "+971 50 765 4321".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    fn employee(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            account: account(password, confirm),
            details: RoleDetails::Employee(EmployeeDetails {
                department: "Operations".into(),
                position: "PRO officer".into(),
            }),
        }
    }

    #[test]
    fn valid_employee_form_passes() {
        let form = employee("secret12", "secret12");
        assert!(form.validate(&FormPolicy::default()).is_ok());
        let payload = form.to_create_user_payload().unwrap();
        assert_eq!(payload.role, Role::Employee);
        assert_eq!(payload.department.as_deref(), Some("Operations"));
    }

    #[test]
    fn mismatch_is_reported_on_confirm_password() {
        let err = employee("secret12", "secret13")
            .validate(&FormPolicy::default())
            .unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.get("confirmPassword"), ["Passwords do not match".to_string()]);
        assert!(!errors.has("password"));
    }

    #[test]
    fn short_password_respects_policy() {
        let policy = FormPolicy {
            min_password_len: 8,
        };
        let err = employee("abc123", "abc123").validate(&policy).unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get("password"),
            ["Password must be at least 8 characters".to_string()]
        );
    }

    #[test]
    fn role_specific_fields_are_checked() {
        let form = RegistrationForm {
            account: account("secret12", "secret12"),
            details: RoleDetails::Partner(PartnerDetails {
                company_name: String::new(),
                partner_type: "sponsor".into(),
                trade_license_number: "TL-8812".into(),
                bank_name: Some("Emirates NBD".into()),
                ..Default::default()
            }),
        };
        let err = form.validate(&FormPolicy::default()).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.has("companyName"));
        assert!(errors.has("accountNumber"));
        assert!(!errors.has("partnerType"));
    }

    #[test]
    fn account_shape_errors() {
        let mut fields = account("secret12", "secret12");
        fields.email = "not-an-email".into();
        fields.phone = "12".into();
        fields.name = String::new();
        let form = SignUpForm {
            account: fields,
            nationality: None,
        };
        let err = form.validate(&FormPolicy::default()).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.has("email"));
        assert!(errors.has("phone"));
        assert!(errors.has("name"));
    }

    #[test]
    fn partners_cannot_use_json_payload() {
        let form = RegistrationForm {
            account: account("secret12", "secret12"),
            details: RoleDetails::Partner(PartnerDetails::default()),
        };
        assert!(matches!(
            form.to_create_user_payload(),
            Err(Error::Unsupported(_))
        ));
        assert!(employee("secret12", "secret12")
            .into_partner_multipart()
            .is_err());
    }
}
