//! Money error types.

use thiserror::Error;
use dividas_shared::AppError;

/// Errors raised at the amount input boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Amount is NaN, infinite, negative, or outside the representable range.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::InvalidAmount(msg) => Self::InvalidAmount(msg),
        }
    }
}
