use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lifecycle::{Entity, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    Full,
    Installments,
}

impl PaymentPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPlan::Full => "full",
            PaymentPlan::Installments => "installments",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl PaymentStatus {
    pub fn is_verdict(&self) -> bool {
        matches!(self, PaymentStatus::Approved | PaymentStatus::Rejected)
    }

    /// Whether a (new) receipt can be uploaded. Uploading is what moves a
    /// payment back to `submitted`; the status endpoint only records verdicts.
    pub fn accepts_receipt(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Rejected)
    }
}

// Operators only record a verdict on a submitted receipt.
impl Status for PaymentStatus {
    const ALL: &'static [Self] = &[
        PaymentStatus::Pending,
        PaymentStatus::Submitted,
        PaymentStatus::Approved,
        PaymentStatus::Rejected,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Submitted => "submitted",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
        }
    }

    fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Submitted, PaymentStatus::Approved)
                | (PaymentStatus::Submitted, PaymentStatus::Rejected)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub receipt_image: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(flatten, with = "crate::models::document_id")]
    pub id: String,
    pub application_id: String,
    pub client_id: String,
    pub total_amount: Decimal,
    pub payment_plan: PaymentPlan,
    pub status: PaymentStatus,
    #[serde(default)]
    pub installments: Vec<Installment>,
    pub receipt_image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn approved_amount(&self) -> Decimal {
        match self.payment_plan {
            PaymentPlan::Full if self.status == PaymentStatus::Approved => self.total_amount,
            PaymentPlan::Full => Decimal::ZERO,
            PaymentPlan::Installments => self
                .installments
                .iter()
                .filter(|i| i.status == PaymentStatus::Approved)
                .map(|i| i.amount)
                .sum(),
        }
    }

    pub fn outstanding(&self) -> Decimal {
        (self.total_amount - self.approved_amount()).max(Decimal::ZERO)
    }

    pub fn installment(&self, index: usize) -> Option<&Installment> {
        self.installments.get(index)
    }
}

impl Entity for Payment {
    type Status = PaymentStatus;

    const KIND: &'static str = "payment";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.application_id.as_str(), self.client_id.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.payment_plan.as_str())
    }
}
