//! Payment request and outcome types.

use chrono::NaiveDate;
use dividas_shared::types::Money;

use crate::receipt::ReceiptUpload;
use crate::schedule::PaymentRecord;

/// Request to pay the next pending installment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayInstallment {
    /// Amount actually paid. Used only for variable-pricing purchases.
    pub amount: Option<Money>,
    /// Receipt to store with the payment.
    pub receipt: Option<ReceiptUpload>,
    /// Payment date.
    pub paid_on: NaiveDate,
}

impl PayInstallment {
    /// Pay at the scheduled amount without a receipt.
    #[must_use]
    pub fn on(paid_on: NaiveDate) -> Self {
        Self {
            amount: None,
            receipt: None,
            paid_on,
        }
    }

    /// Set the amount paid.
    #[must_use]
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Attach a receipt.
    #[must_use]
    pub fn with_receipt(mut self, receipt: ReceiptUpload) -> Self {
        self.receipt = Some(receipt);
        self
    }
}

/// Result of a pay-next request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Paid count after the request.
    pub installments_paid: u32,
    /// Recorded payment; `None` when the purchase was already settled.
    pub payment: Option<PaymentRecord>,
}

impl PaymentOutcome {
    /// Returns true when nothing was written because every installment was paid.
    #[must_use]
    pub fn already_settled(&self) -> bool {
        self.payment.is_none()
    }
}
