//! Persistence seam for purchases, overrides and payment records.
//!
//! The core crate only defines the trait; `dividas-store` ships an
//! in-memory implementation.

mod error;

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, Utc};
use dividas_shared::types::{Money, PurchaseId, UserId};

pub use error::RepositoryError;

use crate::schedule::{InstallmentOverride, OverrideTable, PaymentRecord, Purchase};

/// Atomic "pay next installment" write.
///
/// Applied only when the stored paid count still equals `expected_paid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPayment {
    /// Purchase being paid.
    pub purchase_id: PurchaseId,
    /// Paid count read before computing the payment.
    pub expected_paid: u32,
    /// Override to upsert for the paid installment.
    pub override_amount: Option<Money>,
    /// Payment record to upsert for the paid installment.
    pub payment: PaymentRecord,
    /// New update timestamp of the purchase.
    pub updated_at: DateTime<Utc>,
}

/// Repository trait for purchase persistence.
///
/// Installment overrides and payment records are keyed by
/// `(purchase_id, installment_number)`; upserts replace the existing entry.
pub trait PurchaseRepository: Send + Sync {
    /// Insert a new purchase.
    fn insert_purchase(
        &self,
        purchase: Purchase,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Replace an existing purchase.
    ///
    /// Overrides and payment records numbered past the new installment count
    /// are removed in the same write.
    fn update_purchase(
        &self,
        purchase: Purchase,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Find a purchase by ID, regardless of owner.
    fn find_purchase(
        &self,
        id: PurchaseId,
    ) -> impl Future<Output = Result<Option<Purchase>, RepositoryError>> + Send;

    /// List every purchase of an owner.
    fn list_by_owner(
        &self,
        owner: UserId,
    ) -> impl Future<Output = Result<Vec<Purchase>, RepositoryError>> + Send;

    /// Delete a purchase with its overrides and payments.
    ///
    /// Returns the removed payment records.
    fn delete_purchase(
        &self,
        id: PurchaseId,
    ) -> impl Future<Output = Result<Vec<PaymentRecord>, RepositoryError>> + Send;

    /// Overrides of a purchase, ascending by installment number.
    fn overrides_for(
        &self,
        id: PurchaseId,
    ) -> impl Future<Output = Result<Vec<InstallmentOverride>, RepositoryError>> + Send;

    /// Override tables of several purchases. Purchases without overrides are absent.
    fn overrides_for_many(
        &self,
        ids: &[PurchaseId],
    ) -> impl Future<Output = Result<HashMap<PurchaseId, OverrideTable>, RepositoryError>> + Send;

    /// Insert or replace one override.
    fn upsert_override(
        &self,
        value: InstallmentOverride,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Create overrides at `amount` for every number in `1..=count` that has none.
    ///
    /// Returns the number of overrides created.
    fn seed_missing_overrides(
        &self,
        id: PurchaseId,
        count: u32,
        amount: Money,
    ) -> impl Future<Output = Result<u32, RepositoryError>> + Send;

    /// Payment records of a purchase, ascending by installment number.
    fn payments_for(
        &self,
        id: PurchaseId,
    ) -> impl Future<Output = Result<Vec<PaymentRecord>, RepositoryError>> + Send;

    /// Payment record of one installment.
    fn find_payment(
        &self,
        id: PurchaseId,
        installment_number: u32,
    ) -> impl Future<Output = Result<Option<PaymentRecord>, RepositoryError>> + Send;

    /// Insert or replace a payment record.
    ///
    /// Returns the record it replaced.
    fn upsert_payment(
        &self,
        record: PaymentRecord,
    ) -> impl Future<Output = Result<Option<PaymentRecord>, RepositoryError>> + Send;

    /// Payment record holding the receipt stored at `location`.
    fn find_by_receipt_location(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<Option<PaymentRecord>, RepositoryError>> + Send;

    /// Apply a payment atomically: bump the paid count, upsert the override and
    /// the payment record.
    ///
    /// Fails with [`RepositoryError::Conflict`] and writes nothing when the
    /// stored paid count differs from `expected_paid`, and with
    /// [`RepositoryError::NotPayable`] when the purchase is already settled or
    /// the payment is not for the next unpaid installment. Returns the new count.
    fn commit_payment(
        &self,
        commit: CommitPayment,
    ) -> impl Future<Output = Result<u32, RepositoryError>> + Send;
}
