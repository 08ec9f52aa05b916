//! Installment payments.
//!
//! Paying the next installment is a compare-and-set on the purchase's paid
//! count, so two concurrent payments cannot both succeed.

mod error;
mod service;
mod types;


pub use error::PaymentError;
pub use service::PaymentService;
pub use types::{PayInstallment, PaymentOutcome};
