//! Per-purchase totals and progress.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use dividas_shared::types::{Money, PurchaseId};

use super::engine::ScheduleEngine;
use super::types::{InstallmentStatus, OverrideTable, Purchase};

/// Totals and dates shown on a purchase card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseSummary {
    /// Purchase ID.
    pub purchase_id: PurchaseId,
    /// Sum of every scheduled installment.
    pub total: Money,
    /// Sum of paid installments.
    pub paid: Money,
    /// Sum of pending installments.
    pub remaining: Money,
    /// Number of paid installments.
    pub paid_count: u32,
    /// Number of pending installments.
    pub pending_count: u32,
    /// Paid count over installment count, as a percentage with two decimals.
    pub progress_percent: Decimal,
    /// Due date of the next pending installment.
    pub next_due: Option<NaiveDate>,
    /// Due date of the last installment.
    pub last_due: Option<NaiveDate>,
    /// Whether every installment is paid.
    pub is_settled: bool,
}

impl PurchaseSummary {
    /// Summarizes a purchase from its scheduled amounts.
    #[must_use]
    pub fn summarize(purchase: &Purchase, overrides: &OverrideTable) -> Self {
        let mut paid = Money::ZERO;
        let mut remaining = Money::ZERO;

        for number in 1..=purchase.installment_count {
            let amount = ScheduleEngine::amount_for(purchase, number, overrides);
            match ScheduleEngine::status_for(purchase, number) {
                InstallmentStatus::Paid => paid += amount,
                InstallmentStatus::Pending => remaining += amount,
            }
        }

        let paid_count = purchase.paid_count();
        let pending_count = purchase.installment_count - paid_count;

        let progress_percent = if purchase.installment_count == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(paid_count) / Decimal::from(purchase.installment_count)
                * Decimal::ONE_HUNDRED)
                .round_dp(2)
        };

        let next_due = if purchase.is_settled() {
            None
        } else {
            ScheduleEngine::due_date(purchase, paid_count + 1)
        };

        Self {
            purchase_id: purchase.id,
            total: paid + remaining,
            paid,
            remaining,
            paid_count,
            pending_count,
            progress_percent,
            next_due,
            last_due: ScheduleEngine::due_date(purchase, purchase.installment_count),
            is_settled: purchase.is_settled(),
        }
    }
}
