use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::models::ticket::Priority;

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[validate(length(min = 1, message = "Select an employee"))]
    pub assigned_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "Estimated hours cannot be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
}
