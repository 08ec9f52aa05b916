//! Payment service implementation.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dividas_shared::types::{Money, PaymentId, PurchaseId, UserId};
use tracing::{info, warn};

use super::error::PaymentError;
use super::types::{PayInstallment, PaymentOutcome};
use crate::purchase::authorize;
use crate::receipt::{ReceiptError, ReceiptStore, ReceiptUpload};
use crate::repository::{CommitPayment, PurchaseRepository};
use crate::schedule::{PaymentRecord, Purchase, ReceiptRef, ScheduleEngine, override_table};

/// Records installment payments and their receipts.
pub struct PaymentService<R: PurchaseRepository, S: ReceiptStore> {
    repo: Arc<R>,
    receipts: Arc<S>,
}

impl<R: PurchaseRepository, S: ReceiptStore> PaymentService<R, S> {
    /// Create a new payment service.
    #[must_use]
    pub fn new(repo: Arc<R>, receipts: Arc<S>) -> Self {
        Self { repo, receipts }
    }

    /// Pay the next pending installment.
    ///
    /// The amount recorded is the supplied amount for variable-pricing
    /// purchases (which also becomes the installment's override), otherwise
    /// the scheduled amount. A settled purchase is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The purchase is missing or not the owner's
    /// - The receipt is rejected or cannot be stored
    /// - Another payment was committed concurrently (`Conflict`, retryable)
    pub async fn pay_next(
        &self,
        owner: UserId,
        id: PurchaseId,
        request: PayInstallment,
    ) -> Result<PaymentOutcome, PaymentError> {
        let purchase = authorize(self.repo.as_ref(), owner, id).await?;

        if purchase.is_settled() {
            info!(purchase_id = %id, paid = purchase.installments_paid, "purchase already settled");
            return Ok(PaymentOutcome {
                installments_paid: purchase.installments_paid,
                payment: None,
            });
        }

        let number = purchase.installments_paid + 1;
        let supplied = request
            .amount
            .filter(|amount| purchase.variable_pricing && amount.is_positive());
        let amount_paid = match supplied {
            Some(amount) => amount,
            None => self.scheduled_amount(&purchase, number).await?,
        };

        let receipt = self.store_receipt(request.receipt).await?;

        let payment = PaymentRecord {
            id: PaymentId::new(),
            purchase_id: id,
            installment_number: number,
            payment_date: request.paid_on,
            amount_paid,
            receipt: receipt.clone(),
        };
        let commit = CommitPayment {
            purchase_id: id,
            expected_paid: purchase.installments_paid,
            override_amount: supplied,
            payment: payment.clone(),
            updated_at: Utc::now(),
        };

        match self.repo.commit_payment(commit).await {
            Ok(installments_paid) => {
                info!(
                    purchase_id = %id,
                    installment = number,
                    amount = %amount_paid,
                    "installment paid"
                );
                Ok(PaymentOutcome {
                    installments_paid,
                    payment: Some(payment),
                })
            }
            Err(e) => {
                warn!(purchase_id = %id, installment = number, error = %e, "payment not committed");
                if let Some(receipt) = &receipt {
                    self.discard_receipt(id, receipt).await;
                }
                Err(e.into())
            }
        }
    }

    /// Attach a receipt to an already-paid installment.
    ///
    /// An existing payment record keeps its date and amount. A missing one is
    /// created with `today` and the scheduled amount. A replaced receipt file
    /// is removed best-effort.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase is not the owner's, the installment is
    /// not paid, or the receipt cannot be stored.
    pub async fn attach_receipt(
        &self,
        owner: UserId,
        id: PurchaseId,
        installment_number: u32,
        upload: ReceiptUpload,
        today: NaiveDate,
    ) -> Result<PaymentRecord, PaymentError> {
        let purchase = authorize(self.repo.as_ref(), owner, id).await?;

        let paid = purchase.paid_count();
        if installment_number == 0 || installment_number > paid {
            return Err(PaymentError::NotPaid {
                number: installment_number,
                paid,
            });
        }

        let receipt = self
            .receipts
            .put(upload)
            .await
            .map_err(ReceiptError::from)?;

        let record = match self.repo.find_payment(id, installment_number).await? {
            Some(existing) => PaymentRecord {
                receipt: Some(receipt.clone()),
                ..existing
            },
            None => PaymentRecord {
                id: PaymentId::new(),
                purchase_id: id,
                installment_number,
                payment_date: today,
                amount_paid: self.scheduled_amount(&purchase, installment_number).await?,
                receipt: Some(receipt.clone()),
            },
        };

        let previous = match self.repo.upsert_payment(record.clone()).await {
            Ok(previous) => previous,
            Err(e) => {
                self.discard_receipt(id, &receipt).await;
                return Err(e.into());
            }
        };

        if let Some(old) = previous.and_then(|p| p.receipt)
            && old.location != receipt.location
        {
            self.discard_receipt(id, &old).await;
        }

        info!(purchase_id = %id, installment = installment_number, "receipt attached");
        Ok(record)
    }

    async fn scheduled_amount(
        &self,
        purchase: &Purchase,
        number: u32,
    ) -> Result<Money, PaymentError> {
        if !purchase.variable_pricing {
            return Ok(purchase.base_amount);
        }
        let overrides = override_table(&self.repo.overrides_for(purchase.id).await?);
        Ok(ScheduleEngine::amount_for(purchase, number, &overrides))
    }

    async fn store_receipt(
        &self,
        upload: Option<ReceiptUpload>,
    ) -> Result<Option<ReceiptRef>, PaymentError> {
        match upload {
            Some(upload) => Ok(Some(self.receipts.put(upload).await?)),
            None => Ok(None),
        }
    }

    async fn discard_receipt(&self, id: PurchaseId, receipt: &ReceiptRef) {
        if let Err(e) = self.receipts.delete(&receipt.location).await {
            warn!(purchase_id = %id, location = %receipt.location, error = %e, "failed to remove receipt");
        }
    }
}
