use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::lifecycle::{Entity, Status};
use crate::models::payment::PaymentStatus;
use crate::models::user::ActorRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Approved,
    InProcess,
    Completed,
    Rejected,
}

// Admins pick the pipeline stage freely from a dropdown.
impl Status for ApplicationStatus {
    const ALL: &'static [Self] = &[
        ApplicationStatus::Submitted,
        ApplicationStatus::UnderReview,
        ApplicationStatus::Approved,
        ApplicationStatus::InProcess,
        ApplicationStatus::Completed,
        ApplicationStatus::Rejected,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::UnderReview => "under_review",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::InProcess => "in_process",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    #[serde(default)]
    pub service_type: String,
    pub partner_type: Option<String>,
    #[serde(default)]
    pub external_companies: Vec<String>,
    #[serde(default)]
    pub virtual_office: bool,
    pub estimated_value: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub current: ApplicationStatus,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDocument {
    #[serde(rename = "type")]
    pub document_type: String,
    pub file_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayment {
    pub status: Option<PaymentStatus>,
    pub total_amount: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub event: String,
    pub description: Option<String>,
    pub performed_by: Option<ActorRef>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(flatten, with = "crate::models::document_id")]
    pub id: String,
    pub application_id: Option<String>,
    pub client: ApplicationClient,
    #[serde(default)]
    pub service_details: ServiceDetails,
    pub status: StatusRecord,
    #[serde(default)]
    pub assigned_employees: Vec<ActorRef>,
    #[serde(default)]
    pub documents: Vec<ApplicationDocument>,
    pub payment: Option<ApplicationPayment>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn reference(&self) -> &str {
        self.application_id.as_deref().unwrap_or(&self.id)
    }

    pub fn is_assigned_to(&self, actor_id: &str) -> bool {
        self.assigned_employees.iter().any(|a| a.id == actor_id)
    }
}

impl Entity for Application {
    type Status = ApplicationStatus;

    const KIND: &'static str = "application";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ApplicationStatus {
        self.status.current
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.reference(),
            self.client.name.as_str(),
            self.client.email.as_str(),
            self.service_details.service_type.as_str(),
        ];
        fields.extend(self.client.nationality.as_deref());
        fields
    }

    fn category(&self) -> Option<&str> {
        Some(self.service_details.service_type.as_str())
    }

    fn label(&self) -> &str {
        self.reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn decodes_application_with_nested_records() {
        let app: Application = serde_json::from_str(
            r#"{
                "_id": "a1",
                "applicationId": "APP-2025-0042",
                "client": {"name": "Sara Haddad", "email": "sara@mail.com", "nationality": "Jordanian"},
                "serviceDetails": {
                    "serviceType": "company_formation",
                    "partnerType": "sponsor",
                    "externalCompanies": ["Acme FZ"],
                    "virtualOffice": true,
                    "estimatedValue": "15000.00"
                },
                "status": {"current": "under_review"},
                "assignedEmployees": ["e1", {"_id": "e2", "name": "Yusuf"}],
                "documents": [{"type": "passport", "fileUrl": "/uploads/p.pdf"}],
                "timeline": [{"event": "submitted"}]
            }"#,
        )
        .unwrap();

        assert_eq!(app.status(), ApplicationStatus::UnderReview);
        assert_eq!(app.label(), "APP-2025-0042");
        assert!(app.is_assigned_to("e2"));
        assert_eq!(
            app.service_details.estimated_value,
            Some(Decimal::from_str("15000").unwrap())
        );
        assert!(app.search_fields().contains(&"Jordanian"));
    }
}
