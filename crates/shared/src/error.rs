//! Error taxonomy shared by every Dividas crate.

use thiserror::Error;

/// What went wrong, as seen from the presentation boundary.
///
/// Domain errors in `dividas-core` convert into this type. Each variant maps
/// to one status code and one stable error code.
#[derive(Debug, Error)]
pub enum AppError {
    /// The purchase or receipt belongs to another owner.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// No such purchase, payment or receipt.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected by a write-path rule.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Anchor or reference date could not be parsed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Amount is non-finite or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Another payment landed first; retrying may succeed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Receipt exceeds the upload limit.
    #[error("receipt too large: {0}")]
    PayloadTooLarge(String),

    /// Receipt type is not accepted.
    #[error("unsupported receipt type: {0}")]
    UnsupportedMediaType(String),

    /// Receipt storage failed.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status a web layer would answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidDate(_) | Self::InvalidAmount(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::PayloadTooLarge(_) => 413,
            Self::UnsupportedMediaType(_) => 415,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::Conflict(_) => "CONFLICT",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Only a lost payment race is worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
