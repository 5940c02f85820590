use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
    Partner,
    Client,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Employee, Role::Partner, Role::Client];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Partner => "partner",
            Role::Client => "client",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Employee => "/employee/dashboard",
            Role::Partner => "/partner/dashboard",
            Role::Client => "/client/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub sms_notifications: bool,
    pub language: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten, with = "crate::models::document_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_address")]
    pub address: Option<Address>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub nationality: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub company_name: Option<String>,
    pub partner_type: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub iban: Option<String>,
    pub trade_license_number: Option<String>,
    #[serde(default)]
    pub settings: UserSettings,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AddressOrText {
        Structured(Address),
        Text(String),
    }

    Ok(match Option::<AddressOrText>::deserialize(deserializer)? {
        None => None,
        Some(AddressOrText::Structured(a)) => Some(a),
        Some(AddressOrText::Text(s)) if s.trim().is_empty() => None,
        Some(AddressOrText::Text(s)) => Some(Address {
            street: Some(s),
            ..Address::default()
        }),
    })
}

/// A reference from one record to a user. The backend sends either the
/// bare id or the populated user document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActorRef {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ActorRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl From<&User> for ActorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
        }
    }
}

impl<'de> Deserialize<'de> for ActorRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Populated {
            #[serde(flatten, with = "crate::models::document_id")]
            id: String,
            name: Option<String>,
            email: Option<String>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IdOrDoc {
            Id(String),
            Doc(Populated),
        }

        match IdOrDoc::deserialize(deserializer)? {
            IdOrDoc::Id(id) => Ok(ActorRef::new(id)),
            IdOrDoc::Doc(doc) => Ok(ActorRef {
                id: doc.id,
                name: doc.name,
                email: doc.email,
            }),
        }
    }
}
