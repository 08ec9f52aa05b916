//! Aggregation data types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use dividas_shared::types::{Money, PurchaseId};

use crate::schedule::ScheduleError;

/// Calendar month, ordered chronologically and displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key. Returns `None` when `month` is outside `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month of year, 1-indexed.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidDate(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Pending amounts per month, with overdue installments folded into the
/// reference month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// Month the aggregate was computed against.
    pub reference_month: MonthKey,
    /// Pending amount per month, ascending.
    pub buckets: BTreeMap<MonthKey, Money>,
}

/// One month of a [`MonthlyAggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// Month.
    pub month: MonthKey,
    /// Pending amount due in the month.
    pub amount: Money,
}

impl MonthlyAggregate {
    /// First `limit` buckets in ascending month order.
    #[must_use]
    pub fn upcoming(&self, limit: usize) -> Vec<MonthlyBucket> {
        self.buckets
            .iter()
            .take(limit)
            .map(|(month, amount)| MonthlyBucket {
                month: *month,
                amount: *amount,
            })
            .collect()
    }

    /// Amount bucketed into `month`, zero when absent.
    #[must_use]
    pub fn get(&self, month: MonthKey) -> Money {
        self.buckets.get(&month).copied().unwrap_or_default()
    }

    /// Sum over every bucket.
    #[must_use]
    pub fn total(&self) -> Money {
        self.buckets.values().sum()
    }

    /// Returns true when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// An installment listed in a month detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthInstallment {
    /// Parent purchase.
    pub purchase_id: PurchaseId,
    /// Product name.
    pub product: String,
    /// Store where it was bought.
    pub store: String,
    /// 1-indexed installment number.
    pub installment_number: u32,
    /// Installment count of the purchase.
    pub installment_count: u32,
    /// Scheduled amount.
    pub amount: Money,
    /// Original due date.
    pub due_date: NaiveDate,
    /// Whether the installment is paid.
    pub paid: bool,
}

/// Installments falling in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDetail {
    /// Month.
    pub month: MonthKey,
    /// Installments, by due date then product.
    pub installments: Vec<MonthInstallment>,
    /// Sum of every listed amount.
    pub total: Money,
    /// Sum of pending listed amounts. Equals the aggregate bucket for the month.
    pub pending_total: Money,
    /// Number of paid installments.
    pub paid_count: usize,
    /// Number of pending installments.
    pub pending_count: usize,
}

/// Totals across all purchases of an owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Number of purchases.
    pub purchase_count: usize,
    /// Number of purchases with installments still pending.
    pub open_count: usize,
    /// Sum of remaining amounts.
    pub total_remaining: Money,
    /// Sum of paid amounts.
    pub total_paid: Money,
    /// Paid plus remaining.
    pub grand_total: Money,
}
