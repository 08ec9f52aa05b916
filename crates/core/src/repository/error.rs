//! Repository error types.

use thiserror::Error;
use dividas_shared::AppError;
use dividas_shared::types::PurchaseId;

/// Persistence errors surfaced by a [`super::PurchaseRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Purchase does not exist.
    #[error("purchase not found: {0}")]
    NotFound(PurchaseId),

    /// Purchase already exists.
    #[error("purchase already exists: {0}")]
    AlreadyExists(PurchaseId),

    /// Stored paid count differs from the one the caller read.
    #[error("paid count changed: expected {expected}, found {actual}")]
    Conflict {
        /// Paid count the caller read.
        expected: u32,
        /// Paid count currently stored.
        actual: u32,
    },

    /// The installment is not the next unpaid slot of the purchase.
    #[error("installment {number} is not payable: {paid} of {count} paid")]
    NotPayable {
        /// Installment the commit tried to pay.
        number: u32,
        /// Paid count currently stored.
        paid: u32,
        /// Installment count currently stored.
        count: u32,
    },

    /// Backend failure.
    #[error("repository backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound(format!("purchase {id}")),
            RepositoryError::AlreadyExists(_)
            | RepositoryError::Conflict { .. }
            | RepositoryError::NotPayable { .. } => {
                Self::Conflict(err.to_string())
            }
            RepositoryError::Backend(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_payable_maps_to_conflict() {
        let err = RepositoryError::NotPayable {
            number: 3,
            paid: 2,
            count: 2,
        };
        assert_eq!(err.to_string(), "installment 3 is not payable: 2 of 2 paid");

        let app = AppError::from(err);
        assert_eq!(app.status_code(), 409);
    }
}
