//! pt-BR parsing and formatting at the input/output boundary.

use rust_decimal::Decimal;
use dividas_shared::types::Money;

/// Parses a user-typed pt-BR amount such as `R$ 1.234,56` or `19,9`.
///
/// Separator rules:
/// - both `.` and `,`: `.` groups thousands, `,` is the decimal mark;
/// - only `,`: decimal mark;
/// - only `.`: decimal mark when the last group has at most two digits,
///   otherwise thousands grouping.
///
/// Fraction digits beyond the second are truncated. Returns `None` for
/// empty or unparseable input.
#[must_use]
pub fn parse_pt_br(raw: &str) -> Option<Money> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut s: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();

    let negative = s.starts_with('-');
    s.retain(|c| c != '-');

    if s.contains(',') {
        s.retain(|c| c != '.');
        s = s.replacen(',', ".", 1);
    } else if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        let last = parts.last().copied().unwrap_or_default();
        s = if last.len() <= 2 {
            format!("{}.{last}", parts[..parts.len() - 1].concat())
        } else {
            parts.concat()
        };
    }

    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let int_digits: String = int_part.chars().take_while(char::is_ascii_digit).collect();
    let frac_digits: String = frac_part
        .chars()
        .take_while(char::is_ascii_digit)
        .take(2)
        .collect();

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let normalized = match (int_digits.is_empty(), frac_digits.is_empty()) {
        (_, true) => int_digits,
        (true, false) => format!("0.{frac_digits}"),
        (false, false) => format!("{int_digits}.{frac_digits}"),
    };

    let value = Decimal::from_str_exact(&normalized).ok()?;
    let money = Money::from_decimal(value);
    Some(if negative { Money::ZERO - money } else { money })
}

/// Formats an amount as `1.234,56` (or `1234,56` without grouping).
#[must_use]
pub fn format_pt_br(money: Money, grouping: bool) -> String {
    let cents = money.cents();
    let abs = cents.unsigned_abs();
    let integer = (abs / 100).to_string();
    let fraction = abs % 100;

    let integer = if grouping {
        group_thousands(&integer)
    } else {
        integer
    };

    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}{integer},{fraction:02}")
}

/// Formats an amount in Brazilian reais, e.g. `R$ 1.234,56`.
#[must_use]
pub fn format_brl(money: Money) -> String {
    let body = format_pt_br(Money::from_cents(money.cents().saturating_abs()), true);
    if money.is_negative() {
        format!("-R$ {body}")
    } else {
        format!("R$ {body}")
    }
}

/// Reads a masked digits-only input as cents, keeping at most `max_digits` digits.
#[must_use]
pub fn digits_to_cents(digits: &str, max_digits: usize) -> Money {
    let kept: String = digits
        .chars()
        .filter(char::is_ascii_digit)
        .take(max_digits)
        .collect();
    kept.parse::<i64>().map(Money::from_cents).unwrap_or_default()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
