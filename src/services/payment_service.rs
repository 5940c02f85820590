use reqwest::multipart::Form;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::dto::payment_dto::{SubmitPaymentForm, VerifyPaymentPayload};
use crate::dto::upload_dto::Attachment;
use crate::error::{Error, FieldErrors, Result};
use crate::forms::derive_errors;
use crate::lifecycle::{LifecycleBackend, Status};
use crate::models::payment::{Payment, PaymentPlan, PaymentStatus};

const RECEIPT_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "pdf"];

#[derive(Clone)]
pub struct PaymentService {
    client: ApiClient,
}

impl PaymentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn pending(&self) -> Result<Vec<Payment>> {
        self.client.get(&["payments", "pending"]).await
    }

    pub async fn for_client(&self) -> Result<Vec<Payment>> {
        self.client.get(&["payments", "client"]).await
    }

    #[instrument(skip(self, form), fields(application_id = %form.application_id))]
    pub async fn submit(&self, form: SubmitPaymentForm) -> Result<Payment> {
        check_submission(&form)?;

        let mut multipart = Form::new()
            .text("applicationId", form.application_id)
            .text("amount", form.amount.to_string())
            .text("paymentPlan", form.payment_plan.as_str());
        if let Some(count) = form.installment_count {
            multipart = multipart.text("installmentCount", count.to_string());
        }
        multipart = multipart.part("receiptImage", form.receipt.into_part()?);

        let payment: Payment = self
            .client
            .post_multipart(&["payments", "submit"], multipart)
            .await?;
        info!(payment_id = %payment.id, "Payment submitted");
        Ok(payment)
    }

    pub async fn verify(
        &self,
        id: &str,
        status: PaymentStatus,
        notes: Option<&str>,
    ) -> Result<Payment> {
        ensure_verdict(status)?;
        self.client
            .patch(
                &["payments", id, "verify"],
                &VerifyPaymentPayload { status, notes },
            )
            .await
    }

    pub async fn verify_installment(
        &self,
        id: &str,
        index: usize,
        status: PaymentStatus,
        notes: Option<&str>,
    ) -> Result<Payment> {
        ensure_verdict(status)?;
        self.client
            .patch(
                &["payments", id, "installments", index.to_string().as_str(), "verify"],
                &VerifyPaymentPayload { status, notes },
            )
            .await
    }

    pub async fn upload_installment_receipt(
        &self,
        id: &str,
        index: usize,
        receipt: Attachment,
    ) -> Result<Payment> {
        check_receipt(&receipt).into_result()?;
        let multipart = Form::new().part("receiptImage", receipt.into_part()?);
        self.client
            .post_multipart(
                &["payments", id, "installments", index.to_string().as_str(), "receipt"],
                multipart,
            )
            .await
    }
}

impl LifecycleBackend<Payment> for PaymentService {
    async fn fetch_all(&self) -> Result<Vec<Payment>> {
        self.pending().await
    }

    async fn update_status(
        &self,
        id: &str,
        status: PaymentStatus,
        note: Option<&str>,
    ) -> Result<Payment> {
        self.verify(id, status, note).await
    }
}

fn ensure_verdict(status: PaymentStatus) -> Result<()> {
    if status.is_verdict() {
        Ok(())
    } else {
        Err(Error::Unsupported(format!(
            "payments can only be approved or rejected, not set to {}",
            status.as_str()
        )))
    }
}

fn check_receipt(receipt: &Attachment) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if receipt.data.is_empty() {
        errors.add("receiptImage", "Receipt file is empty");
    }
    match receipt.extension() {
        Some(ext) if RECEIPT_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => errors.add(
            "receiptImage",
            "Receipt must be an image (jpg, png, webp) or a PDF",
        ),
    }
    errors
}

fn check_submission(form: &SubmitPaymentForm) -> Result<()> {
    let mut errors = derive_errors(form);
    if form.amount <= Decimal::ZERO {
        errors.add("amount", "Amount must be greater than zero");
    }
    if form.payment_plan == PaymentPlan::Installments
        && !form.installment_count.is_some_and(|n| n >= 2)
    {
        errors.add("installmentCount", "Installment plans need at least two installments");
    }
    errors.merge(check_receipt(&form.receipt));
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(amount: i64, plan: PaymentPlan, count: Option<u32>, file: &str) -> SubmitPaymentForm {
        SubmitPaymentForm {
            application_id: "a1".into(),
            amount: Decimal::from(amount),
            payment_plan: plan,
            installment_count: count,
            receipt: Attachment::new(file, "image/png", vec![0x89, 0x50, 0x4E, 0x47]),
        }
    }

    #[test]
    fn submission_checks() {
        assert!(check_submission(&form(500, PaymentPlan::Full, None, "r.png")).is_ok());

        let err = check_submission(&form(0, PaymentPlan::Installments, Some(1), "r.exe"))
            .unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.has("amount"));
        assert!(errors.has("installmentCount"));
        assert!(errors.has("receiptImage"));
    }

    #[test]
    fn only_verdicts_can_be_recorded() {
        assert!(ensure_verdict(PaymentStatus::Approved).is_ok());
        assert!(ensure_verdict(PaymentStatus::Submitted).is_err());
    }

    #[test]
    fn every_offered_status_can_be_recorded() {
        for from in PaymentStatus::ALL {
            for next in from.allowed_next() {
                assert!(ensure_verdict(next).is_ok(), "{:?} -> {:?}", from, next);
            }
        }
    }
}
