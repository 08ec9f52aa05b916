//! Installment schedule engine.
//!
//! Computes due dates, per-installment amounts and paid/pending status for a
//! purchase, and materializes its installment history. Pure computation over
//! records already loaded by the caller.

mod engine;
mod error;
mod summary;
mod types;

#[cfg(test)]
mod props;

pub use engine::{ScheduleEngine, parse_anchor_date};
pub use error::ScheduleError;
pub use summary::PurchaseSummary;
pub use types::{
    InstallmentOverride, InstallmentStatus, InstallmentView, OverrideTable, PaymentDetail,
    PaymentRecord, Purchase, ReceiptRef, override_table,
};
