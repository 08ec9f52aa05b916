//! Receipt storage errors.

use thiserror::Error;
use dividas_shared::AppError;

/// Errors raised by a receipt store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload is bigger than the configured limit.
    #[error("receipt of {size} bytes exceeds the {max} byte limit")]
    FileTooLarge {
        /// Upload size.
        size: u64,
        /// Configured limit.
        max: u64,
    },

    /// Upload has a MIME type outside the allow-list.
    #[error("receipt type '{mime_type}' is not accepted")]
    InvalidMimeType {
        /// Rejected MIME type.
        mime_type: String,
    },

    /// No tier holds the location.
    #[error("receipt not found: {location}")]
    NotFound {
        /// Requested location.
        location: String,
    },

    /// A tier could not be built from its settings.
    #[error("receipt storage misconfigured: {0}")]
    Configuration(String),

    /// A read, write or delete failed.
    #[error("receipt storage failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Upload size over the limit.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }

    /// Disallowed MIME type.
    #[must_use]
    pub fn invalid_mime_type(mime_type: impl Into<String>) -> Self {
        Self::InvalidMimeType {
            mime_type: mime_type.into(),
        }
    }

    /// Missing location.
    #[must_use]
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }

    /// Bad tier settings.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns true when no tier holds the file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::not_found(err.to_string()),
            opendal::ErrorKind::ConfigInvalid => Self::Configuration(err.to_string()),
            _ => Self::Operation(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        match err {
            StorageError::FileTooLarge { .. } => Self::PayloadTooLarge(message),
            StorageError::InvalidMimeType { .. } => Self::UnsupportedMediaType(message),
            StorageError::NotFound { .. } => Self::NotFound(message),
            StorageError::Configuration(_) | StorageError::Operation(_) => Self::Storage(message),
        }
    }
}
