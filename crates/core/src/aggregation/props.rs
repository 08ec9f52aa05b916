//! Property-based tests for monthly aggregation.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use dividas_shared::types::{Money, PurchaseId, UserId};

use super::{AggregationService, MonthKey, OverridesByPurchase};
use crate::schedule::{OverrideTable, Purchase, PurchaseSummary};

fn purchase(anchor: NaiveDate, count: u32, paid: u32, cents: i64) -> Purchase {
    Purchase {
        id: PurchaseId::new(),
        owner: UserId::new(),
        author: "Ana".to_string(),
        product: "Item".to_string(),
        store: "Loja".to_string(),
        anchor_date: Some(anchor),
        installment_count: count,
        installments_paid: paid,
        base_amount: Money::from_cents(cents),
        variable_pricing: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn purchase_strategy() -> impl Strategy<Value = Purchase> {
    (2020i32..2030, 1u32..=12, 1u32..=28, 1u32..36, 0u32..40, 1i64..500_000).prop_map(
        |(y, m, d, count, paid, cents)| {
            let anchor = NaiveDate::from_ymd_opt(y, m, d).expect("day <= 28 is valid");
            purchase(anchor, count, paid, cents)
        },
    )
}

fn reference_strategy() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2032, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("day <= 28 is valid"))
}

proptest! {
    /// No bucket is earlier than the reference month.
    #[test]
    fn prop_no_bucket_before_reference(
        purchases in prop::collection::vec(purchase_strategy(), 0..10),
        reference in reference_strategy(),
    ) {
        let aggregate =
            AggregationService::monthly_aggregate(&purchases, &OverridesByPurchase::new(), reference);
        let reference_month = MonthKey::from_date(reference);

        for month in aggregate.buckets.keys() {
            prop_assert!(*month >= reference_month);
        }
    }

    /// Collapsing moves amounts between buckets without changing the total.
    #[test]
    fn prop_total_equals_remaining(
        purchases in prop::collection::vec(purchase_strategy(), 0..10),
        reference in reference_strategy(),
    ) {
        let aggregate =
            AggregationService::monthly_aggregate(&purchases, &OverridesByPurchase::new(), reference);
        let remaining: Money = purchases
            .iter()
            .map(|p| PurchaseSummary::summarize(p, &OverrideTable::new()).remaining)
            .sum();

        prop_assert_eq!(aggregate.total(), remaining);
    }

    /// Every pending amount in a month detail matches its aggregate bucket.
    #[test]
    fn prop_month_detail_matches_bucket(
        purchases in prop::collection::vec(purchase_strategy(), 0..6),
        reference in reference_strategy(),
    ) {
        let overrides = OverridesByPurchase::new();
        let aggregate = AggregationService::monthly_aggregate(&purchases, &overrides, reference);

        for (month, amount) in &aggregate.buckets {
            let detail = AggregationService::month_details(&purchases, &overrides, reference, *month);
            prop_assert_eq!(detail.pending_total, *amount);
        }
    }
}
