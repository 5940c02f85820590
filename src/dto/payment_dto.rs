use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::dto::upload_dto::Attachment;
use crate::models::payment::{PaymentPlan, PaymentStatus};

#[derive(Debug, Clone, Validate)]
pub struct SubmitPaymentForm {
    #[validate(length(min = 1, message = "Application is required"))]
    pub application_id: String,
    pub amount: Decimal,
    pub payment_plan: PaymentPlan,
    pub installment_count: Option<u32>,
    pub receipt: Attachment,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentPayload<'a> {
    pub status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}
