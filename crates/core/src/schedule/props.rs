//! Property-based tests for the schedule engine.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use dividas_shared::types::{Money, PurchaseId, UserId};

use super::{InstallmentStatus, OverrideTable, PurchaseSummary, Purchase, ScheduleEngine};

fn purchase(anchor: NaiveDate, count: u32, paid: u32, variable: bool) -> Purchase {
    Purchase {
        id: PurchaseId::new(),
        owner: UserId::new(),
        author: "Ana".to_string(),
        product: "Sofa".to_string(),
        store: "Loja".to_string(),
        anchor_date: Some(anchor),
        installment_count: count,
        installments_paid: paid,
        base_amount: Money::from_cents(10_000),
        variable_pricing: variable,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn anchor_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .or_else(|| NaiveDate::from_ymd_opt(y, m, 28))
            .expect("day 28 exists in every month")
    })
}

proptest! {
    /// Due dates strictly increase with the installment number.
    #[test]
    fn prop_due_dates_increase(anchor in anchor_strategy(), count in 2u32..60) {
        let p = purchase(anchor, count, 0, false);
        let dates: Vec<NaiveDate> = (1..=count)
            .map(|n| ScheduleEngine::due_date(&p, n).expect("in range"))
            .collect();

        prop_assert_eq!(dates[0], anchor);
        for pair in dates.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    /// Exactly `min(paid, count)` installments are paid, and they come first.
    #[test]
    fn prop_status_is_a_prefix(count in 0u32..60, paid in 0u32..80) {
        let p = purchase(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid"), count, paid, false);
        let history = ScheduleEngine::build_history(&p, &OverrideTable::new(), &[]);

        let paid_rows = history.iter().filter(|v| v.status == InstallmentStatus::Paid).count();
        prop_assert_eq!(paid_rows, paid.min(count) as usize);
        for view in &history {
            let expected = if view.installment_number <= paid {
                InstallmentStatus::Paid
            } else {
                InstallmentStatus::Pending
            };
            prop_assert_eq!(view.status, expected);
        }
    }

    /// Variable amounts fall back to the base amount where no override exists.
    #[test]
    fn prop_variable_pricing_fallback(
        count in 1u32..40,
        overrides in prop::collection::btree_map(1u32..40, 0i64..1_000_000, 0..20),
    ) {
        let p = purchase(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid"), count, 0, true);
        let table: OverrideTable = overrides
            .iter()
            .map(|(n, c)| (*n, Money::from_cents(*c)))
            .collect();

        for n in 1..=count {
            let expected = table.get(&n).copied().unwrap_or(p.base_amount);
            prop_assert_eq!(ScheduleEngine::amount_for(&p, n, &table), expected);
        }
    }

    /// Paid plus remaining always equals the schedule total.
    #[test]
    fn prop_summary_partitions_total(count in 0u32..40, paid in 0u32..50, variable in any::<bool>()) {
        let p = purchase(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid"), count, paid, variable);
        let table = OverrideTable::from([(1, Money::from_cents(1)), (3, Money::from_cents(99_999))]);
        let summary = PurchaseSummary::summarize(&p, &table);

        let scheduled: Money = (1..=count)
            .map(|n| ScheduleEngine::amount_for(&p, n, &table))
            .sum();
        prop_assert_eq!(summary.paid + summary.remaining, scheduled);
        prop_assert_eq!(summary.total, scheduled);
    }
}
