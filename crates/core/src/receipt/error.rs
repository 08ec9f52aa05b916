//! Receipt error types.

use thiserror::Error;
use dividas_shared::AppError;

use crate::repository::RepositoryError;
use crate::storage::StorageError;

/// Receipt operation errors.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Requested file name failed sanitisation.
    #[error("invalid receipt file name: {0}")]
    InvalidFileName(String),

    /// No receipt is stored under this name.
    #[error("receipt not found: {0}")]
    NotFound(String),

    /// Receipt belongs to another owner.
    #[error("access denied to receipt {0}")]
    Forbidden(String),

    /// Upload exceeds the size limit.
    #[error("receipt too large: {size} bytes exceeds maximum {max} bytes")]
    FileTooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Upload has a disallowed MIME type.
    #[error("receipt MIME type not allowed: {0}")]
    InvalidMimeType(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<StorageError> for ReceiptError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::FileTooLarge { size, max } => Self::FileTooLarge { size, max },
            StorageError::InvalidMimeType { mime_type } => Self::InvalidMimeType(mime_type),
            StorageError::NotFound { location } => Self::NotFound(location),
            other => Self::Storage(other),
        }
    }
}

impl From<ReceiptError> for AppError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::InvalidFileName(_) => Self::Validation(err.to_string()),
            ReceiptError::NotFound(_) => Self::NotFound(err.to_string()),
            ReceiptError::Forbidden(_) => Self::Forbidden(err.to_string()),
            ReceiptError::FileTooLarge { .. } => Self::PayloadTooLarge(err.to_string()),
            ReceiptError::InvalidMimeType(_) => Self::UnsupportedMediaType(err.to_string()),
            ReceiptError::Storage(e) => e.into(),
            ReceiptError::Repository(e) => e.into(),
        }
    }
}
