//! Purchase management.
//!
//! This module provides owner-scoped operations on purchases:
//! - Create, edit, delete and list
//! - Per-installment amounts for variable pricing
//! - Installment history and summaries
//! - The monthly dashboard

mod error;
mod service;
mod types;


pub use error::PurchaseError;
pub use service::{DEFAULT_UPCOMING_MONTHS, PurchaseService};
pub(crate) use service::authorize;
pub use types::{Dashboard, PurchaseForm, PurchaseInput};
