//! JSON snapshots of repository contents.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dividas_core::schedule::{InstallmentOverride, PaymentRecord, Purchase};
use dividas_shared::types::PurchaseId;

/// Snapshot loading errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The document is not a valid snapshot.
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Two purchases share an id.
    #[error("duplicate purchase {0}")]
    DuplicatePurchase(PurchaseId),

    /// An override or payment references a purchase not in the snapshot.
    #[error("unknown purchase {0}")]
    UnknownPurchase(PurchaseId),

    /// An override or payment is outside `1..=installment_count`.
    #[error("installment {number} out of range for purchase {purchase_id}")]
    InstallmentOutOfRange {
        /// Parent purchase.
        purchase_id: PurchaseId,
        /// Offending installment number.
        number: u32,
    },
}

/// Serialized repository contents.
///
/// Overrides and payments are flat lists keyed by purchase id, the same shape
/// as the relational tables they mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Purchases.
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    /// Per-installment amounts of variable-pricing purchases.
    #[serde(default)]
    pub overrides: Vec<InstallmentOverride>,
    /// Payment records.
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl Snapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if the document does not match.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
