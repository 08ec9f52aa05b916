//! Monthly aggregation of pending installments across purchases.
//!
//! Everything here is synchronous and pure: callers load purchases and
//! override tables, then ask for buckets, month details or portfolio totals.

mod service;
mod types;

#[cfg(test)]
mod props;

pub use service::{AggregationService, OverridesByPurchase};
pub use types::{
    MonthDetail, MonthInstallment, MonthKey, MonthlyAggregate, MonthlyBucket, PortfolioTotals,
};
