//! Schedule error types.

use thiserror::Error;
use dividas_shared::AppError;

/// Errors raised at the schedule input boundary.
///
/// The engine itself never fails; these come from parsing caller input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Anchor date is not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidDate(raw) => Self::InvalidDate(raw),
        }
    }
}
