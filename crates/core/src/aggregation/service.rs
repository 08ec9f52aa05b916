//! Monthly aggregation service.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use dividas_shared::types::{Money, PurchaseId};
use tracing::debug;

use super::types::{MonthDetail, MonthInstallment, MonthKey, MonthlyAggregate, PortfolioTotals};
use crate::schedule::{InstallmentStatus, OverrideTable, Purchase, PurchaseSummary, ScheduleEngine};

static NO_OVERRIDES: OverrideTable = BTreeMap::new();

/// Override tables of several purchases.
pub type OverridesByPurchase = HashMap<PurchaseId, OverrideTable>;

/// Service for aggregating installments across purchases.
pub struct AggregationService;

impl AggregationService {
    /// Sums pending installments per due month.
    ///
    /// Installments due before the first day of the reference month are
    /// counted in the reference month. Purchases without installments or
    /// without an anchor date contribute nothing.
    #[must_use]
    pub fn monthly_aggregate(
        purchases: &[Purchase],
        overrides: &OverridesByPurchase,
        reference_date: NaiveDate,
    ) -> MonthlyAggregate {
        let reference_month = MonthKey::from_date(reference_date);
        let mut buckets: BTreeMap<MonthKey, Money> = BTreeMap::new();

        for purchase in purchases {
            let table = overrides_of(overrides, purchase.id);
            for number in purchase.installments_paid.saturating_add(1)..=purchase.installment_count
            {
                let Some(due) = ScheduleEngine::due_date(purchase, number) else {
                    continue;
                };
                let month = effective_month(due, reference_month);
                *buckets.entry(month).or_default() +=
                    ScheduleEngine::amount_for(purchase, number, table);
            }
        }

        debug!(
            purchases = purchases.len(),
            buckets = buckets.len(),
            reference_month = %reference_month,
            "monthly aggregate computed"
        );

        MonthlyAggregate {
            reference_month,
            buckets,
        }
    }

    /// Lists the installments that fall in `month`.
    ///
    /// Every installment, paid or not, is listed under its effective month:
    /// anything due before the reference month collapses into it. The pending
    /// ones are exactly those counted by [`Self::monthly_aggregate`], so
    /// `pending_total` matches the aggregate bucket.
    #[must_use]
    pub fn month_details(
        purchases: &[Purchase],
        overrides: &OverridesByPurchase,
        reference_date: NaiveDate,
        month: MonthKey,
    ) -> MonthDetail {
        let reference_month = MonthKey::from_date(reference_date);
        let mut installments = Vec::new();

        for purchase in purchases {
            let table = overrides_of(overrides, purchase.id);
            for number in 1..=purchase.installment_count {
                let Some(due) = ScheduleEngine::due_date(purchase, number) else {
                    continue;
                };
                let paid = ScheduleEngine::status_for(purchase, number) == InstallmentStatus::Paid;
                if effective_month(due, reference_month) != month {
                    continue;
                }

                installments.push(MonthInstallment {
                    purchase_id: purchase.id,
                    product: purchase.product.clone(),
                    store: purchase.store.clone(),
                    installment_number: number,
                    installment_count: purchase.installment_count,
                    amount: ScheduleEngine::amount_for(purchase, number, table),
                    due_date: due,
                    paid,
                });
            }
        }

        installments.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.product.cmp(&b.product))
                .then_with(|| a.installment_number.cmp(&b.installment_number))
        });

        let total: Money = installments.iter().map(|i| i.amount).sum();
        let pending_total: Money = installments
            .iter()
            .filter(|i| !i.paid)
            .map(|i| i.amount)
            .sum();
        let paid_count = installments.iter().filter(|i| i.paid).count();

        MonthDetail {
            month,
            pending_count: installments.len() - paid_count,
            paid_count,
            total,
            pending_total,
            installments,
        }
    }

    /// Totals across every purchase.
    ///
    /// Each purchase contributes its paid and remaining amounts floored at zero.
    #[must_use]
    pub fn portfolio_totals(
        purchases: &[Purchase],
        overrides: &OverridesByPurchase,
    ) -> PortfolioTotals {
        let mut totals = PortfolioTotals {
            purchase_count: purchases.len(),
            ..PortfolioTotals::default()
        };

        for purchase in purchases {
            let summary = PurchaseSummary::summarize(purchase, overrides_of(overrides, purchase.id));
            totals.total_paid += summary.paid.floor_zero();
            totals.total_remaining += summary.remaining.floor_zero();
            if !summary.is_settled {
                totals.open_count += 1;
            }
        }

        totals.grand_total = totals.total_paid + totals.total_remaining;
        totals
    }
}

fn overrides_of(overrides: &OverridesByPurchase, id: PurchaseId) -> &OverrideTable {
    overrides.get(&id).unwrap_or(&NO_OVERRIDES)
}

fn effective_month(due: NaiveDate, reference_month: MonthKey) -> MonthKey {
    MonthKey::from_date(due).max(reference_month)
}
