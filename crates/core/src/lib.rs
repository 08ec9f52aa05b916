//! Core business logic for Dividas.
//!
//! This crate holds the installment engine and the services built on it. It
//! has no web or database dependencies; persistence sits behind the
//! [`repository::PurchaseRepository`] trait and receipt files behind
//! [`receipt::ReceiptStore`].
//!
//! # Modules
//!
//! - `money` - Amount parsing and pt-BR formatting
//! - `schedule` - Due dates, amounts and status per installment
//! - `aggregation` - Monthly totals with past-due collapse
//! - `purchase` - Owner-scoped purchase management and the dashboard
//! - `payment` - Paying installments and attaching receipts
//! - `receipt` - Receipt naming and owner-checked access
//! - `repository` - Persistence seam with the atomic payment commit
//! - `storage` - OpenDAL-backed receipt storage

pub mod aggregation;
pub mod money;
pub mod payment;
pub mod purchase;
pub mod receipt;
pub mod repository;
pub mod schedule;
pub mod storage;

#[cfg(test)]
mod testing;
