//! Due dates, amounts and status per installment.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use dividas_shared::types::Money;

use super::error::ScheduleError;
use super::types::{
    InstallmentStatus, InstallmentView, OverrideTable, PaymentDetail, PaymentRecord, Purchase,
};

/// Installment schedule computations.
pub struct ScheduleEngine;

impl ScheduleEngine {
    /// Due date of an installment: the anchor date plus `n - 1` calendar months.
    ///
    /// The day of month is clamped to the end of shorter months
    /// (Jan 31 + 1 month = Feb 28/29). Returns `None` for installment 0, a
    /// missing anchor date, or a date beyond the calendar range.
    #[must_use]
    pub fn due_date(purchase: &Purchase, installment_number: u32) -> Option<NaiveDate> {
        let offset = installment_number.checked_sub(1)?;
        purchase
            .anchor_date?
            .checked_add_months(Months::new(offset))
    }

    /// Scheduled amount of an installment.
    ///
    /// Variable pricing uses the override for `n` when one exists; everything
    /// else falls back to the purchase's base amount.
    #[must_use]
    pub fn amount_for(
        purchase: &Purchase,
        installment_number: u32,
        overrides: &OverrideTable,
    ) -> Money {
        if purchase.variable_pricing
            && let Some(amount) = overrides.get(&installment_number)
        {
            return *amount;
        }
        purchase.base_amount
    }

    /// Paid iff `n <= installments_paid`.
    ///
    /// The paid count is authoritative; payment records only carry detail.
    #[must_use]
    pub fn status_for(purchase: &Purchase, installment_number: u32) -> InstallmentStatus {
        if installment_number <= purchase.installments_paid {
            InstallmentStatus::Paid
        } else {
            InstallmentStatus::Pending
        }
    }

    /// One view per installment, ascending by number.
    ///
    /// When a payment record exists its `amount_paid` replaces the scheduled
    /// amount. Payment detail is attached to paid installments only.
    #[must_use]
    pub fn build_history(
        purchase: &Purchase,
        overrides: &OverrideTable,
        payments: &[PaymentRecord],
    ) -> Vec<InstallmentView> {
        let by_number: BTreeMap<u32, &PaymentRecord> = payments
            .iter()
            .filter(|p| p.purchase_id == purchase.id)
            .map(|p| (p.installment_number, p))
            .collect();

        (1..=purchase.installment_count)
            .map(|number| {
                let payment = by_number.get(&number).copied();
                let status = Self::status_for(purchase, number);
                let amount = payment.map_or_else(
                    || Self::amount_for(purchase, number, overrides),
                    |p| p.amount_paid,
                );

                InstallmentView {
                    installment_number: number,
                    due_date: Self::due_date(purchase, number),
                    amount,
                    status,
                    payment: payment
                        .filter(|_| status == InstallmentStatus::Paid)
                        .map(PaymentDetail::from),
                }
            })
            .collect()
    }
}

/// Parses an anchor date in `YYYY-MM-DD` form.
///
/// A trailing time component (`2024-01-15T00:00:00`) is ignored.
pub fn parse_anchor_date(raw: &str) -> Result<NaiveDate, ScheduleError> {
    let trimmed = raw.trim();
    let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| ScheduleError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{ReceiptRef, override_table};
    use crate::schedule::InstallmentOverride;
    use chrono::Utc;
    use dividas_shared::types::{PaymentId, PurchaseId, UserId};
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn purchase(count: u32, paid: u32, base_cents: i64, variable: bool) -> Purchase {
        Purchase {
            id: PurchaseId::new(),
            owner: UserId::new(),
            author: "Ana".to_string(),
            product: "Geladeira".to_string(),
            store: "Loja".to_string(),
            anchor_date: Some(date(2024, 1, 15)),
            installment_count: count,
            installments_paid: paid,
            base_amount: Money::from_cents(base_cents),
            variable_pricing: variable,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(1, date(2024, 1, 15))]
    #[case(2, date(2024, 2, 15))]
    #[case(3, date(2024, 3, 15))]
    #[case(13, date(2025, 1, 15))]
    fn test_due_date(#[case] n: u32, #[case] expected: NaiveDate) {
        let p = purchase(24, 0, 10_000, false);
        assert_eq!(ScheduleEngine::due_date(&p, n), Some(expected));
    }

    #[test]
    fn test_due_date_clamps_to_month_end() {
        let mut p = purchase(3, 0, 10_000, false);
        p.anchor_date = Some(date(2024, 1, 31));
        assert_eq!(ScheduleEngine::due_date(&p, 2), Some(date(2024, 2, 29)));
        assert_eq!(ScheduleEngine::due_date(&p, 3), Some(date(2024, 3, 31)));
    }

    #[test]
    fn test_due_date_edge_inputs() {
        let mut p = purchase(3, 0, 10_000, false);
        assert_eq!(ScheduleEngine::due_date(&p, 0), None);
        p.anchor_date = None;
        assert_eq!(ScheduleEngine::due_date(&p, 1), None);
    }

    #[test]
    fn test_variable_pricing_fallback() {
        let p = purchase(3, 0, 10_000, true);
        let overrides = OverrideTable::from([(2, Money::from_cents(15_000))]);

        assert_eq!(ScheduleEngine::amount_for(&p, 1, &overrides), Money::from_cents(10_000));
        assert_eq!(ScheduleEngine::amount_for(&p, 2, &overrides), Money::from_cents(15_000));
        assert_eq!(ScheduleEngine::amount_for(&p, 3, &overrides), Money::from_cents(10_000));
    }

    #[test]
    fn test_fixed_pricing_ignores_overrides() {
        let p = purchase(3, 0, 10_000, false);
        let overrides = OverrideTable::from([(2, Money::from_cents(15_000))]);
        assert_eq!(ScheduleEngine::amount_for(&p, 2, &overrides), Money::from_cents(10_000));
    }

    #[test]
    fn test_status_for() {
        let p = purchase(3, 1, 10_000, false);
        assert_eq!(ScheduleEngine::status_for(&p, 1), InstallmentStatus::Paid);
        assert_eq!(ScheduleEngine::status_for(&p, 2), InstallmentStatus::Pending);
    }

    #[test]
    fn test_history_example_scenario() {
        let p = purchase(3, 1, 10_000, false);
        let history = ScheduleEngine::build_history(&p, &OverrideTable::new(), &[]);

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].due_date, Some(date(2024, 1, 15)));
        assert_eq!(history[0].status, InstallmentStatus::Paid);
        assert!(history[0].payment.is_none());
        assert_eq!(history[1].due_date, Some(date(2024, 2, 15)));
        assert_eq!(history[1].status, InstallmentStatus::Pending);
        assert_eq!(history[1].amount, Money::from_cents(10_000));
        assert_eq!(history[2].due_date, Some(date(2024, 3, 15)));
        assert_eq!(history[2].status, InstallmentStatus::Pending);
        assert_eq!(history[2].amount, Money::from_cents(10_000));
    }

    #[test]
    fn test_history_prefers_payment_amount() {
        let p = purchase(3, 2, 10_000, true);
        let overrides = override_table(&[InstallmentOverride {
            purchase_id: p.id,
            installment_number: 2,
            amount: Money::from_cents(12_000),
        }]);
        let payment = PaymentRecord {
            id: PaymentId::new(),
            purchase_id: p.id,
            installment_number: 2,
            payment_date: date(2024, 2, 10),
            amount_paid: Money::from_cents(11_000),
            receipt: Some(ReceiptRef {
                location: "a.pdf".to_string(),
                display_name: "boleto.pdf".to_string(),
                mime_type: Some("application/pdf".to_string()),
            }),
        };

        let history = ScheduleEngine::build_history(&p, &overrides, &[payment]);

        assert_eq!(history[1].amount, Money::from_cents(11_000));
        let detail = history[1].payment.as_ref().expect("payment detail");
        assert_eq!(detail.payment_date, date(2024, 2, 10));
        assert_eq!(detail.receipt.as_ref().map(|r| r.display_name.as_str()), Some("boleto.pdf"));
        assert!(history[0].payment.is_none());
    }

    #[test]
    fn test_history_hides_detail_for_pending() {
        let p = purchase(3, 1, 10_000, false);
        let payment = PaymentRecord {
            id: PaymentId::new(),
            purchase_id: p.id,
            installment_number: 3,
            payment_date: date(2024, 3, 1),
            amount_paid: Money::from_cents(9_000),
            receipt: None,
        };

        let history = ScheduleEngine::build_history(&p, &OverrideTable::new(), &[payment]);

        assert_eq!(history[2].status, InstallmentStatus::Pending);
        assert_eq!(history[2].amount, Money::from_cents(9_000));
        assert!(history[2].payment.is_none());
    }

    #[test]
    fn test_history_empty_for_zero_installments() {
        let p = purchase(0, 0, 10_000, false);
        assert!(ScheduleEngine::build_history(&p, &OverrideTable::new(), &[]).is_empty());
    }

    #[rstest]
    #[case("2024-01-15", Ok(date(2024, 1, 15)))]
    #[case(" 2024-01-15 ", Ok(date(2024, 1, 15)))]
    #[case("2024-01-15T03:00:00.000Z", Ok(date(2024, 1, 15)))]
    #[case("2024-02-30", Err(ScheduleError::InvalidDate("2024-02-30".to_string())))]
    #[case("15/01/2024", Err(ScheduleError::InvalidDate("15/01/2024".to_string())))]
    fn test_parse_anchor_date(#[case] raw: &str, #[case] expected: Result<NaiveDate, ScheduleError>) {
        assert_eq!(parse_anchor_date(raw), expected);
    }
}
