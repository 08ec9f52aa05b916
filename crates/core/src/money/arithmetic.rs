//! Sums and products over minor units.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use dividas_shared::types::{AmountPolicy, Money};

use super::error::MoneyError;

/// Converts an amount to whole cents, rounding half away from zero.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> i64 {
    Money::from_decimal(amount).cents()
}

/// Converts whole cents back to a decimal with two fraction digits.
#[must_use]
pub fn from_minor_units(cents: i64) -> Decimal {
    Money::from_cents(cents).to_decimal()
}

/// Sums amounts exactly by accumulating cents.
#[must_use]
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .map(Money::from_decimal)
        .sum::<Money>()
        .to_decimal()
}

/// Multiplies an amount by an integer factor in cents.
#[must_use]
pub fn multiply(amount: Decimal, factor: i64) -> Decimal {
    Money::from_decimal(amount).times(factor).to_decimal()
}

/// Converts a floating-point input into [`Money`] under the given policy.
///
/// `Lenient` maps NaN and infinities to zero and keeps the sign of finite
/// values. `Strict` rejects non-finite, negative and out-of-range inputs.
pub fn amount_from_f64(value: f64, policy: AmountPolicy) -> Result<Money, MoneyError> {
    if !value.is_finite() {
        return match policy {
            AmountPolicy::Lenient => Ok(Money::ZERO),
            AmountPolicy::Strict => Err(MoneyError::InvalidAmount(format!(
                "{value} is not a finite number"
            ))),
        };
    }

    let Some(decimal) = Decimal::from_f64(value) else {
        return match policy {
            AmountPolicy::Lenient => Ok(Money::ZERO),
            AmountPolicy::Strict => Err(MoneyError::InvalidAmount(format!(
                "{value} is out of range"
            ))),
        };
    };

    if policy == AmountPolicy::Strict && decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(MoneyError::InvalidAmount(format!("{value} is negative")));
    }
    Ok(Money::from_decimal(decimal))
}

/// Sums floating-point inputs, treating non-finite values as zero.
#[must_use]
pub fn sum_f64(values: &[f64]) -> Money {
    values
        .iter()
        .map(|v| amount_from_f64(*v, AmountPolicy::Lenient).unwrap_or_default())
        .sum()
}

/// Multiplies a floating-point input by an integer factor, treating non-finite values as zero.
#[must_use]
pub fn multiply_f64(value: f64, factor: i64) -> Money {
    amount_from_f64(value, AmountPolicy::Lenient)
        .unwrap_or_default()
        .times(factor)
}
