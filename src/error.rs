use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::utils::validation::wire_field_name;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("Invalid form: {0}")]
    Form(FieldErrors),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Cannot move {kind} from {from} to {to}")]
    InvalidTransition {
        kind: &'static str,
        from: &'static str,
        to: &'static str,
    },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Error::Validation { errors, .. } | Error::Form(errors) => Some(errors),
            _ => None,
        }
    }

    /// Text shown to the operator when an action fails.
    pub fn user_message(&self) -> String {
        match self {
            Error::Transport(err) if err.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            Error::Transport(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            Error::Unauthorized(_) => "Your session has expired. Please log in again.".to_string(),
            Error::Forbidden(_) => "You do not have access to this page.".to_string(),
            Error::NotFound(msg) => msg.clone(),
            Error::Validation { message, errors } => match errors.general().first() {
                Some(first) if message.is_empty() => first.clone(),
                _ if message.is_empty() => "Please correct the highlighted fields.".to_string(),
                _ => message.clone(),
            },
            Error::Form(_) => "Please correct the highlighted fields.".to_string(),
            Error::Server { message, .. } if !message.is_empty() => message.clone(),
            Error::Server { .. } => "Something went wrong. Please try again.".to_string(),
            Error::InvalidTransition { .. } | Error::Unsupported(_) => self.to_string(),
            Error::Cancelled => "The request was cancelled.".to_string(),
            Error::Config(_) | Error::Json(_) | Error::Url(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Error::Form(FieldErrors::from(&errors))
    }
}

/// One entry of a server `errors[]` array. Objects carry the field they
/// belong to; bare strings have no field.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ServerFieldError {
    Structured {
        #[serde(default, alias = "path", alias = "param")]
        field: Option<String>,
        #[serde(alias = "msg")]
        message: String,
    },
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ServerFieldError>,
}

/// Validation messages keyed by wire field name (`confirmPassword`), plus a
/// general bucket for messages that name no field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
    general: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(wire_field_name(field))
            .or_default()
            .push(message.into());
    }

    pub fn add_general(&mut self, message: impl Into<String>) {
        self.general.push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields
            .get(&wire_field_name(field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn general(&self) -> &[String] {
        &self.general
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_empty()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
        self.general.extend(other.general);
    }

    pub fn from_server(errors: &[ServerFieldError]) -> Self {
        let mut out = Self::new();
        for entry in errors {
            match entry {
                ServerFieldError::Structured {
                    field: Some(field),
                    message,
                } if !field.trim().is_empty() => out.add(field, message.clone()),
                ServerFieldError::Structured { message, .. } => out.add_general(message.clone()),
                ServerFieldError::Text(message) => out.add_general(message.clone()),
            }
        }
        out
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Form(self))
        }
    }
}

impl From<&validator::ValidationErrors> for FieldErrors {
    fn from(errors: &validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, list) in errors.field_errors() {
            for err in list.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", wire_field_name(&field)));
                out.add(&field, message);
            }
        }
        out
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .fields
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{}: {}", field, m)))
            .collect();
        parts.extend(self.general.iter().cloned());
        write!(f, "{}", parts.join("; "))
    }
}
