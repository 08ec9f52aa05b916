//! Payment error types.

use thiserror::Error;
use dividas_shared::AppError;

use crate::purchase::PurchaseError;
use crate::receipt::ReceiptError;
use crate::repository::RepositoryError;
use crate::storage::StorageError;

/// Payment operation errors.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Purchase lookup or authorisation failed.
    #[error(transparent)]
    Purchase(#[from] PurchaseError),

    /// Receipts can only be attached to paid installments.
    #[error("installment {number} is not paid ({paid} paid)")]
    NotPaid {
        /// Requested installment number.
        number: u32,
        /// Paid count of the purchase.
        paid: u32,
    },

    /// Another payment was committed concurrently; the caller may retry.
    #[error("concurrent payment: expected {expected} paid, found {actual}")]
    Conflict {
        /// Paid count read before committing.
        expected: u32,
        /// Paid count found at commit time.
        actual: u32,
    },

    /// Receipt validation or storage failed.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl PaymentError {
    /// Returns true when retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<RepositoryError> for PaymentError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { expected, actual } => Self::Conflict { expected, actual },
            RepositoryError::NotFound(id) => Self::Purchase(PurchaseError::NotFound(id)),
            other => Self::Repository(other),
        }
    }
}

impl From<StorageError> for PaymentError {
    fn from(err: StorageError) -> Self {
        Self::Receipt(err.into())
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Purchase(e) => e.into(),
            PaymentError::NotPaid { .. } => Self::Validation(err.to_string()),
            PaymentError::Conflict { .. } => Self::Conflict(err.to_string()),
            PaymentError::Receipt(e) => e.into(),
            PaymentError::Repository(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dividas_shared::types::PurchaseId;

    #[test]
    fn test_repository_conflict_is_retryable() {
        let err = PaymentError::from(RepositoryError::Conflict {
            expected: 1,
            actual: 2,
        });
        assert!(err.is_retryable());
        assert_eq!(AppError::from(err).status_code(), 409);
    }

    #[test]
    fn test_error_mapping() {
        let id = PurchaseId::new();
        let err = PaymentError::from(RepositoryError::NotFound(id));
        assert!(matches!(err, PaymentError::Purchase(PurchaseError::NotFound(found)) if found == id));

        let err = PaymentError::from(StorageError::invalid_mime_type("text/html"));
        assert_eq!(AppError::from(err).status_code(), 415);

        let err = PaymentError::NotPaid { number: 3, paid: 1 };
        assert!(!err.is_retryable());
        assert_eq!(AppError::from(err).status_code(), 400);
    }
}
