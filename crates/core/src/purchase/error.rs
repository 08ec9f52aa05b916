//! Purchase error types.

use thiserror::Error;
use dividas_shared::AppError;
use dividas_shared::types::PurchaseId;

use crate::money::MoneyError;
use crate::repository::RepositoryError;
use crate::schedule::ScheduleError;

/// Purchase operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    /// Purchase not found.
    #[error("purchase not found: {0}")]
    NotFound(PurchaseId),

    /// Purchase belongs to another owner.
    #[error("access denied to purchase {0}")]
    Forbidden(PurchaseId),

    /// Input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Per-installment amounts require variable pricing.
    #[error("purchase {0} does not use variable pricing")]
    NotVariable(PurchaseId),

    /// Installment number outside `1..=count`.
    #[error("installment {number} is out of range 1..={count}")]
    InstallmentOutOfRange {
        /// Requested installment number.
        number: u32,
        /// Installment count of the purchase.
        count: u32,
    },

    /// Amount rejected at the input boundary.
    #[error(transparent)]
    InvalidAmount(#[from] MoneyError),

    /// Date rejected at the input boundary.
    #[error(transparent)]
    InvalidDate(#[from] ScheduleError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl PurchaseError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an out-of-range error.
    #[must_use]
    pub fn out_of_range(number: u32, count: u32) -> Self {
        Self::InstallmentOutOfRange { number, count }
    }
}

impl From<RepositoryError> for PurchaseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<PurchaseError> for AppError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::NotFound(id) => Self::NotFound(format!("purchase {id}")),
            PurchaseError::Forbidden(_) => Self::Forbidden(err.to_string()),
            PurchaseError::Validation(msg) => Self::Validation(msg),
            PurchaseError::NotVariable(_) | PurchaseError::InstallmentOutOfRange { .. } => {
                Self::Validation(err.to_string())
            }
            PurchaseError::InvalidAmount(e) => e.into(),
            PurchaseError::InvalidDate(e) => e.into(),
            PurchaseError::Repository(e) => e.into(),
        }
    }
}
