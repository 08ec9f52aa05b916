//! Purchase service implementation.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dividas_shared::types::{Money, PurchaseId, UserId};
use tracing::{info, warn};

use super::error::PurchaseError;
use super::types::{Dashboard, PurchaseInput};
use crate::aggregation::AggregationService;
use crate::receipt::ReceiptStore;
use crate::repository::PurchaseRepository;
use crate::schedule::{
    InstallmentOverride, InstallmentView, OverrideTable, Purchase, PurchaseSummary, ScheduleEngine,
    override_table,
};

/// Default number of monthly buckets on the dashboard.
pub const DEFAULT_UPCOMING_MONTHS: usize = 12;

/// Owner-scoped purchase management.
pub struct PurchaseService<R: PurchaseRepository, S: ReceiptStore> {
    repo: Arc<R>,
    receipts: Arc<S>,
    upcoming_months: usize,
}

impl<R: PurchaseRepository, S: ReceiptStore> PurchaseService<R, S> {
    /// Create a new purchase service.
    #[must_use]
    pub fn new(repo: Arc<R>, receipts: Arc<S>) -> Self {
        Self {
            repo,
            receipts,
            upcoming_months: DEFAULT_UPCOMING_MONTHS,
        }
    }

    /// Set the number of monthly buckets shown on the dashboard.
    #[must_use]
    pub fn with_upcoming_months(mut self, months: usize) -> Self {
        self.upcoming_months = months;
        self
    }

    /// Load a purchase and check it belongs to `owner`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing purchase and `Forbidden` for one owned
    /// by someone else.
    pub async fn authorize(&self, owner: UserId, id: PurchaseId) -> Result<Purchase, PurchaseError> {
        authorize(self.repo.as_ref(), owner, id).await
    }

    /// Create a purchase.
    ///
    /// Variable-pricing purchases get one override per installment at the
    /// base amount.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or persistence fails.
    pub async fn create(&self, owner: UserId, input: PurchaseInput) -> Result<Purchase, PurchaseError> {
        input.validate()?;

        let now = Utc::now();
        let purchase = Purchase {
            id: PurchaseId::new(),
            owner,
            installments_paid: input.clamped_paid(),
            author: input.author,
            product: input.product,
            store: input.store,
            anchor_date: input.anchor_date,
            installment_count: input.installment_count,
            base_amount: input.base_amount,
            variable_pricing: input.variable_pricing,
            created_at: now,
            updated_at: now,
        };

        self.repo.insert_purchase(purchase.clone()).await?;
        if purchase.variable_pricing {
            self.repo
                .seed_missing_overrides(purchase.id, purchase.installment_count, purchase.base_amount)
                .await?;
        }

        info!(purchase_id = %purchase.id, installments = purchase.installment_count, "purchase created");
        Ok(purchase)
    }

    /// Edit a purchase.
    ///
    /// Existing overrides are kept up to the new installment count; rows past
    /// it are dropped by the repository. Installments without an override are
    /// seeded at the base amount when the result uses variable pricing.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase is not the owner's, validation fails,
    /// or persistence fails.
    pub async fn update(
        &self,
        owner: UserId,
        id: PurchaseId,
        input: PurchaseInput,
    ) -> Result<Purchase, PurchaseError> {
        input.validate()?;
        let current = self.authorize(owner, id).await?;

        let purchase = Purchase {
            installments_paid: input.clamped_paid(),
            author: input.author,
            product: input.product,
            store: input.store,
            anchor_date: input.anchor_date,
            installment_count: input.installment_count,
            base_amount: input.base_amount,
            variable_pricing: input.variable_pricing,
            updated_at: Utc::now(),
            ..current
        };

        self.repo.update_purchase(purchase.clone()).await?;
        if purchase.variable_pricing {
            let seeded = self
                .repo
                .seed_missing_overrides(purchase.id, purchase.installment_count, purchase.base_amount)
                .await?;
            if seeded > 0 {
                info!(purchase_id = %id, seeded, "seeded missing installment amounts");
            }
        }

        info!(purchase_id = %id, "purchase updated");
        Ok(purchase)
    }

    /// Delete a purchase with its overrides and payments.
    ///
    /// Stored receipts are removed best-effort; failures are logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase is not the owner's or persistence fails.
    pub async fn delete(&self, owner: UserId, id: PurchaseId) -> Result<(), PurchaseError> {
        self.authorize(owner, id).await?;

        let removed = self.repo.delete_purchase(id).await?;
        for receipt in removed.iter().filter_map(|p| p.receipt.as_ref()) {
            if let Err(e) = self.receipts.delete(&receipt.location).await {
                warn!(purchase_id = %id, location = %receipt.location, error = %e, "failed to remove receipt");
            }
        }

        info!(purchase_id = %id, payments = removed.len(), "purchase deleted");
        Ok(())
    }

    /// Purchases of an owner, most recent anchor date first.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<Purchase>, PurchaseError> {
        let mut purchases = self.repo.list_by_owner(owner).await?;
        purchases.sort_by(|a, b| {
            b.anchor_date
                .cmp(&a.anchor_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(purchases)
    }

    /// Overrides of a purchase, ascending by installment number.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase is not the owner's or persistence fails.
    pub async fn overrides(
        &self,
        owner: UserId,
        id: PurchaseId,
    ) -> Result<Vec<InstallmentOverride>, PurchaseError> {
        self.authorize(owner, id).await?;
        let mut overrides = self.repo.overrides_for(id).await?;
        overrides.sort_by_key(|o| o.installment_number);
        Ok(overrides)
    }

    /// Set the amount of one installment of a variable-pricing purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase is not the owner's, is not variable,
    /// the number is out of range, or the amount is not positive.
    pub async fn set_installment_amount(
        &self,
        owner: UserId,
        id: PurchaseId,
        installment_number: u32,
        amount: Money,
    ) -> Result<InstallmentOverride, PurchaseError> {
        let purchase = self.authorize(owner, id).await?;

        if !purchase.variable_pricing {
            return Err(PurchaseError::NotVariable(id));
        }
        if !(1..=purchase.installment_count).contains(&installment_number) {
            return Err(PurchaseError::out_of_range(
                installment_number,
                purchase.installment_count,
            ));
        }
        if !amount.is_positive() {
            return Err(PurchaseError::validation(
                "installment amount must be greater than zero",
            ));
        }

        let value = InstallmentOverride {
            purchase_id: id,
            installment_number,
            amount,
        };
        self.repo.upsert_override(value).await?;
        Ok(value)
    }

    /// Installment history of a purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase is not the owner's or persistence fails.
    pub async fn history(
        &self,
        owner: UserId,
        id: PurchaseId,
    ) -> Result<Vec<InstallmentView>, PurchaseError> {
        let purchase = self.authorize(owner, id).await?;
        let overrides = override_table(&self.repo.overrides_for(id).await?);
        let payments = self.repo.payments_for(id).await?;
        Ok(ScheduleEngine::build_history(&purchase, &overrides, &payments))
    }

    /// Totals and dates of a purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the purchase is not the owner's or persistence fails.
    pub async fn summary(&self, owner: UserId, id: PurchaseId) -> Result<PurchaseSummary, PurchaseError> {
        let purchase = self.authorize(owner, id).await?;
        let overrides = override_table(&self.repo.overrides_for(id).await?);
        Ok(PurchaseSummary::summarize(&purchase, &overrides))
    }

    /// Monthly buckets, totals and per-purchase summaries of an owner.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub async fn dashboard(
        &self,
        owner: UserId,
        reference_date: NaiveDate,
    ) -> Result<Dashboard, PurchaseError> {
        let purchases = self.list(owner).await?;
        let ids: Vec<PurchaseId> = purchases.iter().map(|p| p.id).collect();
        let overrides = self.repo.overrides_for_many(&ids).await?;

        let aggregate = AggregationService::monthly_aggregate(&purchases, &overrides, reference_date);
        let totals = AggregationService::portfolio_totals(&purchases, &overrides);
        let empty = OverrideTable::new();
        let summaries = purchases
            .iter()
            .map(|p| PurchaseSummary::summarize(p, overrides.get(&p.id).unwrap_or(&empty)))
            .collect();

        Ok(Dashboard {
            reference_date,
            upcoming: aggregate.upcoming(self.upcoming_months),
            aggregate,
            totals,
            summaries,
        })
    }
}

/// Loads a purchase and checks it belongs to `owner`.
pub(crate) async fn authorize<R: PurchaseRepository>(
    repo: &R,
    owner: UserId,
    id: PurchaseId,
) -> Result<Purchase, PurchaseError> {
    let purchase = repo
        .find_purchase(id)
        .await?
        .ok_or(PurchaseError::NotFound(id))?;

    if purchase.owner != owner {
        return Err(PurchaseError::Forbidden(id));
    }
    Ok(purchase)
}
