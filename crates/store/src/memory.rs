//! `DashMap`-backed purchase repository.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::mapref::one::RefMut;
use tracing::{debug, info};

use dividas_core::repository::{CommitPayment, PurchaseRepository, RepositoryError};
use dividas_core::schedule::{InstallmentOverride, OverrideTable, PaymentRecord, Purchase};
use dividas_shared::types::{Money, PurchaseId, UserId};

use crate::snapshot::{Snapshot, SnapshotError};

/// A purchase together with the rows that belong to it.
#[derive(Debug, Clone)]
struct Entry {
    purchase: Purchase,
    overrides: OverrideTable,
    payments: BTreeMap<u32, PaymentRecord>,
}

impl Entry {
    fn new(purchase: Purchase) -> Self {
        Self {
            purchase,
            overrides: OverrideTable::new(),
            payments: BTreeMap::new(),
        }
    }

    /// Drop rows for installments past `count`.
    fn prune_beyond(&mut self, count: u32) {
        let overrides = self.overrides.split_off(&count.saturating_add(1)).len();
        let payments = self.payments.split_off(&count.saturating_add(1)).len();
        if overrides + payments > 0 {
            debug!(
                purchase_id = %self.purchase.id,
                count,
                overrides,
                payments,
                "pruned rows past installment count"
            );
        }
    }
}

/// In-memory purchase repository.
///
/// Each purchase owns its overrides and payments, so every write to one
/// purchase (including a whole payment commit) happens under a single shard
/// lock. Operations fail until [`InMemoryRepository::initialize`] has run.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    purchases: DashMap<PurchaseId, Entry>,
    initialized: AtomicBool,
}

impl InMemoryRepository {
    /// Create an empty, uninitialized repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare the repository for use.
    ///
    /// Safe to call more than once; returns true only on the first call.
    pub fn initialize(&self) -> bool {
        let first = !self.initialized.swap(true, Ordering::SeqCst);
        if first {
            info!("purchase repository initialized");
        }
        first
    }

    /// Returns true once `initialize` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Build an initialized repository from a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or references purchases or
    /// installments that do not exist.
    pub fn from_snapshot(json: &str) -> Result<Self, SnapshotError> {
        Self::load(Snapshot::from_json(json)?)
    }

    /// Build an initialized repository from a parsed snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate purchases or dangling rows.
    pub fn load(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        let repo = Self::new();

        for purchase in snapshot.purchases {
            match repo.purchases.entry(purchase.id) {
                MapEntry::Occupied(_) => return Err(SnapshotError::DuplicatePurchase(purchase.id)),
                MapEntry::Vacant(slot) => {
                    slot.insert(Entry::new(purchase));
                }
            }
        }

        for row in snapshot.overrides {
            let mut entry = repo.row_owner(row.purchase_id, row.installment_number)?;
            entry.overrides.insert(row.installment_number, row.amount);
        }

        for record in snapshot.payments {
            let mut entry = repo.row_owner(record.purchase_id, record.installment_number)?;
            entry.payments.insert(record.installment_number, record);
        }

        repo.initialize();
        debug!(purchases = repo.purchases.len(), "snapshot loaded");
        Ok(repo)
    }

    /// Export the current contents.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for entry in &self.purchases {
            let id = entry.purchase.id;
            snapshot.purchases.push(entry.purchase.clone());
            snapshot
                .overrides
                .extend(entry.overrides.iter().map(|(n, amount)| InstallmentOverride {
                    purchase_id: id,
                    installment_number: *n,
                    amount: *amount,
                }));
            snapshot.payments.extend(entry.payments.values().cloned());
        }
        snapshot.purchases.sort_by_key(|p| p.id);
        snapshot
            .overrides
            .sort_by_key(|o| (o.purchase_id, o.installment_number));
        snapshot
            .payments
            .sort_by_key(|p| (p.purchase_id, p.installment_number));
        snapshot
    }

    /// Number of stored purchases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.purchases.len()
    }

    /// Returns true if no purchases are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }

    fn ready(&self) -> Result<(), RepositoryError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RepositoryError::backend("repository not initialized"))
        }
    }

    fn entry_mut(
        &self,
        id: PurchaseId,
    ) -> Result<RefMut<'_, PurchaseId, Entry>, RepositoryError> {
        self.ready()?;
        self.purchases.get_mut(&id).ok_or(RepositoryError::NotFound(id))
    }

    fn row_owner(
        &self,
        id: PurchaseId,
        number: u32,
    ) -> Result<RefMut<'_, PurchaseId, Entry>, SnapshotError> {
        let entry = self
            .purchases
            .get_mut(&id)
            .ok_or(SnapshotError::UnknownPurchase(id))?;
        if number == 0 || number > entry.purchase.installment_count {
            return Err(SnapshotError::InstallmentOutOfRange {
                purchase_id: id,
                number,
            });
        }
        Ok(entry)
    }
}

impl PurchaseRepository for InMemoryRepository {
    async fn insert_purchase(&self, purchase: Purchase) -> Result<(), RepositoryError> {
        self.ready()?;
        match self.purchases.entry(purchase.id) {
            MapEntry::Occupied(_) => Err(RepositoryError::AlreadyExists(purchase.id)),
            MapEntry::Vacant(slot) => {
                slot.insert(Entry::new(purchase));
                Ok(())
            }
        }
    }

    async fn update_purchase(&self, purchase: Purchase) -> Result<(), RepositoryError> {
        let mut entry = self.entry_mut(purchase.id)?;
        let count = purchase.installment_count;
        entry.purchase = purchase;
        entry.prune_beyond(count);
        Ok(())
    }

    async fn find_purchase(&self, id: PurchaseId) -> Result<Option<Purchase>, RepositoryError> {
        self.ready()?;
        Ok(self.purchases.get(&id).map(|entry| entry.purchase.clone()))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Purchase>, RepositoryError> {
        self.ready()?;
        Ok(self
            .purchases
            .iter()
            .filter(|entry| entry.purchase.owner == owner)
            .map(|entry| entry.purchase.clone())
            .collect())
    }

    async fn delete_purchase(&self, id: PurchaseId) -> Result<Vec<PaymentRecord>, RepositoryError> {
        self.ready()?;
        let (_, entry) = self
            .purchases
            .remove(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        Ok(entry.payments.into_values().collect())
    }

    async fn overrides_for(&self, id: PurchaseId) -> Result<Vec<InstallmentOverride>, RepositoryError> {
        self.ready()?;
        Ok(self
            .purchases
            .get(&id)
            .map(|entry| {
                entry
                    .overrides
                    .iter()
                    .map(|(n, amount)| InstallmentOverride {
                        purchase_id: id,
                        installment_number: *n,
                        amount: *amount,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn overrides_for_many(
        &self,
        ids: &[PurchaseId],
    ) -> Result<HashMap<PurchaseId, OverrideTable>, RepositoryError> {
        self.ready()?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.purchases
                    .get(id)
                    .filter(|entry| !entry.overrides.is_empty())
                    .map(|entry| (*id, entry.overrides.clone()))
            })
            .collect())
    }

    async fn upsert_override(&self, value: InstallmentOverride) -> Result<(), RepositoryError> {
        let mut entry = self.entry_mut(value.purchase_id)?;
        entry.overrides.insert(value.installment_number, value.amount);
        Ok(())
    }

    async fn seed_missing_overrides(
        &self,
        id: PurchaseId,
        count: u32,
        amount: Money,
    ) -> Result<u32, RepositoryError> {
        let mut entry = self.entry_mut(id)?;
        let mut seeded = 0;
        for n in 1..=count {
            if let std::collections::btree_map::Entry::Vacant(slot) = entry.overrides.entry(n) {
                slot.insert(amount);
                seeded += 1;
            }
        }
        Ok(seeded)
    }

    async fn payments_for(&self, id: PurchaseId) -> Result<Vec<PaymentRecord>, RepositoryError> {
        self.ready()?;
        Ok(self
            .purchases
            .get(&id)
            .map(|entry| entry.payments.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_payment(
        &self,
        id: PurchaseId,
        installment_number: u32,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        self.ready()?;
        Ok(self
            .purchases
            .get(&id)
            .and_then(|entry| entry.payments.get(&installment_number).cloned()))
    }

    async fn upsert_payment(&self, record: PaymentRecord) -> Result<Option<PaymentRecord>, RepositoryError> {
        let mut entry = self.entry_mut(record.purchase_id)?;
        Ok(entry.payments.insert(record.installment_number, record))
    }

    async fn find_by_receipt_location(
        &self,
        location: &str,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        self.ready()?;
        Ok(self.purchases.iter().find_map(|entry| {
            entry
                .payments
                .values()
                .find(|p| p.receipt.as_ref().is_some_and(|r| r.location == location))
                .cloned()
        }))
    }

    async fn commit_payment(&self, commit: CommitPayment) -> Result<u32, RepositoryError> {
        let mut entry = self.entry_mut(commit.purchase_id)?;

        let actual = entry.purchase.installments_paid;
        if actual != commit.expected_paid {
            return Err(RepositoryError::Conflict {
                expected: commit.expected_paid,
                actual,
            });
        }

        let number = commit.payment.installment_number;
        let count = entry.purchase.installment_count;
        if actual >= count || number != actual + 1 {
            return Err(RepositoryError::NotPayable {
                number,
                paid: actual,
                count,
            });
        }

        entry.purchase.installments_paid = actual + 1;
        entry.purchase.updated_at = commit.updated_at;
        if let Some(amount) = commit.override_amount {
            entry.overrides.insert(number, amount);
        }
        entry.payments.insert(number, commit.payment);

        Ok(entry.purchase.installments_paid)
    }
}
