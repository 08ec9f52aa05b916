//! Property-based tests for money arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;
use dividas_shared::types::Money;

use super::{format_pt_br, from_minor_units, multiply, parse_pt_br, sum, to_minor_units};

proptest! {
    /// Summing amounts with two fraction digits equals the exact decimal sum.
    #[test]
    fn prop_sum_is_exact(cents in prop::collection::vec(-10_000_000i64..10_000_000, 0..50)) {
        let amounts: Vec<Decimal> = cents.iter().map(|c| Decimal::new(*c, 2)).collect();
        let expected: Decimal = amounts.iter().copied().sum();

        prop_assert_eq!(sum(amounts), expected);
    }

    /// Multiplying by an integer factor equals repeated exact addition.
    #[test]
    fn prop_multiply_is_exact(cents in -1_000_000i64..1_000_000, factor in 0i64..500) {
        let amount = Decimal::new(cents, 2);

        prop_assert_eq!(multiply(amount, factor), amount * Decimal::from(factor));
    }

    /// Cent conversion is lossless for two-digit amounts.
    #[test]
    fn prop_minor_units_lossless(cents in any::<i32>()) {
        let cents = i64::from(cents);
        prop_assert_eq!(to_minor_units(from_minor_units(cents)), cents);
    }

    /// Formatting without grouping and parsing back yields the same amount.
    #[test]
    fn prop_pt_br_format_parse(cents in 0i64..100_000_000_000) {
        let money = Money::from_cents(cents);
        prop_assert_eq!(parse_pt_br(&format_pt_br(money, false)), Some(money));
        prop_assert_eq!(parse_pt_br(&format_pt_br(money, true)), Some(money));
    }
}
