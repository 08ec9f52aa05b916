//! Monetary arithmetic in integer minor units.
//!
//! Every sum and product over currency amounts goes through this module so
//! that results are exact for inputs with at most two fraction digits.

mod arithmetic;
mod error;
mod locale;

#[cfg(test)]
mod props;

pub use arithmetic::{
    amount_from_f64, from_minor_units, multiply, multiply_f64, sum, sum_f64, to_minor_units,
};
pub use error::MoneyError;
pub use locale::{digits_to_cents, format_brl, format_pt_br, parse_pt_br};
