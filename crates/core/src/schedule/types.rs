//! Purchase, override and payment records consumed by the engine.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use dividas_shared::types::{Money, PaymentId, PurchaseId, UserId};

/// A purchase paid in installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Purchase ID.
    pub id: PurchaseId,
    /// Owning user. Every query and mutation is scoped to this.
    pub owner: UserId,
    /// Who made the purchase.
    pub author: String,
    /// What was bought.
    pub product: String,
    /// Where it was bought.
    pub store: String,
    /// Invoice date of the first billing cycle.
    pub anchor_date: Option<NaiveDate>,
    /// Total number of installments.
    pub installment_count: u32,
    /// Installments considered paid, by position.
    pub installments_paid: u32,
    /// Per-installment amount, or the default when pricing is variable.
    pub base_amount: Money,
    /// Whether amounts come from per-installment overrides.
    pub variable_pricing: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// Paid count clamped to the installment count.
    #[must_use]
    pub fn paid_count(&self) -> u32 {
        self.installments_paid.min(self.installment_count)
    }

    /// Returns true once every installment is paid.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.installments_paid >= self.installment_count
    }
}

/// Amount for one installment of a variable-pricing purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentOverride {
    /// Parent purchase.
    pub purchase_id: PurchaseId,
    /// 1-indexed installment number.
    pub installment_number: u32,
    /// Amount owed for this installment.
    pub amount: Money,
}

/// Override amounts of one purchase keyed by installment number.
pub type OverrideTable = BTreeMap<u32, Money>;

/// Builds an [`OverrideTable`] from override records.
#[must_use]
pub fn override_table<'a, I>(overrides: I) -> OverrideTable
where
    I: IntoIterator<Item = &'a InstallmentOverride>,
{
    overrides
        .into_iter()
        .map(|o| (o.installment_number, o.amount))
        .collect()
}

/// Reference to a stored receipt file.
///
/// `location` is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRef {
    /// Storage location of the file.
    pub location: String,
    /// Original file name shown to the user.
    pub display_name: String,
    /// MIME type reported at upload.
    pub mime_type: Option<String>,
}

/// Records that a specific installment was paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment ID.
    pub id: PaymentId,
    /// Parent purchase.
    pub purchase_id: PurchaseId,
    /// 1-indexed installment number.
    pub installment_number: u32,
    /// Date the payment was made.
    pub payment_date: NaiveDate,
    /// Amount actually paid.
    pub amount_paid: Money,
    /// Attached receipt, if any.
    pub receipt: Option<ReceiptRef>,
}

/// Paid/pending classification of an installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    /// Covered by the purchase's paid count.
    Paid,
    /// Still owed.
    Pending,
}

/// Payment details shown in the history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetail {
    /// Date the payment was made.
    pub payment_date: NaiveDate,
    /// Amount actually paid.
    pub amount_paid: Money,
    /// Attached receipt, if any.
    pub receipt: Option<ReceiptRef>,
}

impl From<&PaymentRecord> for PaymentDetail {
    fn from(record: &PaymentRecord) -> Self {
        Self {
            payment_date: record.payment_date,
            amount_paid: record.amount_paid,
            receipt: record.receipt.clone(),
        }
    }
}

/// One row of a purchase's installment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentView {
    /// 1-indexed installment number.
    pub installment_number: u32,
    /// Due date, absent when the purchase has no anchor date.
    pub due_date: Option<NaiveDate>,
    /// Amount owed, or the amount paid when a payment record exists.
    pub amount: Money,
    /// Paid or pending.
    pub status: InstallmentStatus,
    /// Payment details when a payment record exists.
    pub payment: Option<PaymentDetail>,
}
