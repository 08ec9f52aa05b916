//! Purchase input and dashboard types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use dividas_shared::types::{AmountPolicy, Money};

use super::error::PurchaseError;
use crate::aggregation::{MonthlyAggregate, MonthlyBucket, PortfolioTotals};
use crate::money::amount_from_f64;
use crate::schedule::{PurchaseSummary, parse_anchor_date};

/// Validated input for creating or editing a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseInput {
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
    /// Installments already paid. Clamped to the installment count.
    #[serde(default)]
    pub installments_paid: u32,
    /// Per-installment amount.
    pub base_amount: Money,
    /// Whether amounts come from per-installment overrides.
    #[serde(default)]
    pub variable_pricing: bool,
}

impl PurchaseInput {
    /// Checks the write-path constraints.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::Validation` when the product is blank, the
    /// installment count is zero, or the base amount is not positive.
    pub fn validate(&self) -> Result<(), PurchaseError> {
        if self.product.trim().is_empty() {
            return Err(PurchaseError::validation("product is required"));
        }
        if self.installment_count == 0 {
            return Err(PurchaseError::validation(
                "installment count must be at least 1",
            ));
        }
        if !self.base_amount.is_positive() {
            return Err(PurchaseError::validation(
                "installment amount must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Paid count clamped to `0..=installment_count`.
    #[must_use]
    pub fn clamped_paid(&self) -> u32 {
        self.installments_paid.min(self.installment_count)
    }
}

/// Purchase form as submitted by a client: text date and floating-point amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseForm {
    /// Who made the purchase.
    pub author: String,
    /// What was bought.
    pub product: String,
    /// Where it was bought.
    pub store: String,
    /// Invoice date in `YYYY-MM-DD` form.
    pub anchor_date: String,
    /// Total number of installments.
    pub installment_count: u32,
    /// Installments already paid.
    #[serde(default)]
    pub installments_paid: Option<u32>,
    /// Per-installment amount.
    pub base_amount: f64,
    /// Whether amounts come from per-installment overrides.
    #[serde(default)]
    pub variable_pricing: Option<bool>,
}

impl PurchaseForm {
    /// Converts the form into a [`PurchaseInput`].
    ///
    /// # Errors
    ///
    /// Returns an error if the date does not parse or the amount is rejected
    /// by `policy`.
    pub fn into_input(self, policy: AmountPolicy) -> Result<PurchaseInput, PurchaseError> {
        Ok(PurchaseInput {
            anchor_date: Some(parse_anchor_date(&self.anchor_date)?),
            base_amount: amount_from_f64(self.base_amount, policy)?,
            author: self.author.trim().to_string(),
            product: self.product.trim().to_string(),
            store: self.store.trim().to_string(),
            installment_count: self.installment_count,
            installments_paid: self.installments_paid.unwrap_or(0),
            variable_pricing: self.variable_pricing.unwrap_or(false),
        })
    }
}

/// Everything the dashboard shows for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Date the dashboard was computed for.
    pub reference_date: NaiveDate,
    /// Pending amounts per month.
    pub aggregate: MonthlyAggregate,
    /// First buckets of the aggregate, for display.
    pub upcoming: Vec<MonthlyBucket>,
    /// Totals across every purchase.
    pub totals: PortfolioTotals,
    /// Per-purchase summaries, in listing order.
    pub summaries: Vec<PurchaseSummary>,
}
