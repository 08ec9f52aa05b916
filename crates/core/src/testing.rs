//! Test doubles shared by the service tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, Utc};
use dividas_shared::types::{Money, PurchaseId, UserId};

use crate::repository::{CommitPayment, PurchaseRepository, RepositoryError};
use crate::schedule::{InstallmentOverride, OverrideTable, PaymentRecord, Purchase};
use crate::storage::{StorageConfig, StorageProvider, TieredReceiptStore};

#[derive(Default)]
struct State {
    purchases: HashMap<PurchaseId, Purchase>,
    overrides: BTreeMap<(PurchaseId, u32), Money>,
    payments: BTreeMap<(PurchaseId, u32), PaymentRecord>,
}

/// Mock repository for testing.
#[derive(Default)]
pub struct MockRepository {
    state: Mutex<State>,
    conflict_next_commit: AtomicBool,
}

impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `commit_payment` fail as if another writer got there first.
    pub fn conflict_next_commit(&self) {
        self.conflict_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn override_count(&self, id: PurchaseId) -> usize {
        let state = self.state.lock().unwrap();
        state.overrides.keys().filter(|(p, _)| *p == id).count()
    }

    pub fn payment_count(&self, id: PurchaseId) -> usize {
        let state = self.state.lock().unwrap();
        state.payments.keys().filter(|(p, _)| *p == id).count()
    }

    pub fn stored(&self, id: PurchaseId) -> Option<Purchase> {
        self.state.lock().unwrap().purchases.get(&id).cloned()
    }
}

impl PurchaseRepository for MockRepository {
    async fn insert_purchase(&self, purchase: Purchase) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.purchases.contains_key(&purchase.id) {
            return Err(RepositoryError::AlreadyExists(purchase.id));
        }
        state.purchases.insert(purchase.id, purchase);
        Ok(())
    }

    async fn update_purchase(&self, purchase: Purchase) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        let (id, count) = (purchase.id, purchase.installment_count);
        let slot = state
            .purchases
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound(id))?;
        *slot = purchase;
        state.overrides.retain(|(p, n), _| *p != id || *n <= count);
        state.payments.retain(|(p, n), _| *p != id || *n <= count);
        Ok(())
    }

    async fn find_purchase(&self, id: PurchaseId) -> Result<Option<Purchase>, RepositoryError> {
        Ok(self.state.lock().unwrap().purchases.get(&id).cloned())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Purchase>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .purchases
            .values()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect())
    }

    async fn delete_purchase(&self, id: PurchaseId) -> Result<Vec<PaymentRecord>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.purchases.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(id));
        }
        state.overrides.retain(|(p, _), _| *p != id);
        let (removed, kept): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut state.payments)
            .into_iter()
            .partition(|((p, _), _)| *p == id);
        state.payments = kept;
        Ok(removed.into_values().collect())
    }

    async fn overrides_for(&self, id: PurchaseId) -> Result<Vec<InstallmentOverride>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .overrides
            .iter()
            .filter(|((p, _), _)| *p == id)
            .map(|((p, n), amount)| InstallmentOverride {
                purchase_id: *p,
                installment_number: *n,
                amount: *amount,
            })
            .collect())
    }

    async fn overrides_for_many(
        &self,
        ids: &[PurchaseId],
    ) -> Result<HashMap<PurchaseId, OverrideTable>, RepositoryError> {
        let state = self.state.lock().unwrap();
        let mut out: HashMap<PurchaseId, OverrideTable> = HashMap::new();
        for ((p, n), amount) in &state.overrides {
            if ids.contains(p) {
                out.entry(*p).or_default().insert(*n, *amount);
            }
        }
        Ok(out)
    }

    async fn upsert_override(&self, value: InstallmentOverride) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().unwrap();
        state
            .overrides
            .insert((value.purchase_id, value.installment_number), value.amount);
        Ok(())
    }

    async fn seed_missing_overrides(
        &self,
        id: PurchaseId,
        count: u32,
        amount: Money,
    ) -> Result<u32, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let mut seeded = 0;
        for n in 1..=count {
            if let std::collections::btree_map::Entry::Vacant(slot) = state.overrides.entry((id, n)) {
                slot.insert(amount);
                seeded += 1;
            }
        }
        Ok(seeded)
    }

    async fn payments_for(&self, id: PurchaseId) -> Result<Vec<PaymentRecord>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .payments
            .iter()
            .filter(|((p, _), _)| *p == id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn find_payment(
        &self,
        id: PurchaseId,
        installment_number: u32,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state.payments.get(&(id, installment_number)).cloned())
    }

    async fn upsert_payment(&self, record: PaymentRecord) -> Result<Option<PaymentRecord>, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .payments
            .insert((record.purchase_id, record.installment_number), record))
    }

    async fn find_by_receipt_location(
        &self,
        location: &str,
    ) -> Result<Option<PaymentRecord>, RepositoryError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .payments
            .values()
            .find(|p| p.receipt.as_ref().is_some_and(|r| r.location == location))
            .cloned())
    }

    async fn commit_payment(&self, commit: CommitPayment) -> Result<u32, RepositoryError> {
        let mut state = self.state.lock().unwrap();
        let purchase = state
            .purchases
            .get_mut(&commit.purchase_id)
            .ok_or(RepositoryError::NotFound(commit.purchase_id))?;

        if self.conflict_next_commit.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Conflict {
                expected: commit.expected_paid,
                actual: commit.expected_paid + 1,
            });
        }
        if purchase.installments_paid != commit.expected_paid {
            return Err(RepositoryError::Conflict {
                expected: commit.expected_paid,
                actual: purchase.installments_paid,
            });
        }

        let number = commit.payment.installment_number;
        if purchase.installments_paid >= purchase.installment_count
            || number != purchase.installments_paid + 1
        {
            return Err(RepositoryError::NotPayable {
                number,
                paid: purchase.installments_paid,
                count: purchase.installment_count,
            });
        }

        purchase.installments_paid += 1;
        purchase.updated_at = commit.updated_at;
        let paid = purchase.installments_paid;

        if let Some(amount) = commit.override_amount {
            state.overrides.insert((commit.purchase_id, number), amount);
        }
        state.payments.insert((commit.purchase_id, number), commit.payment);
        Ok(paid)
    }
}

pub fn memory_store() -> TieredReceiptStore {
    TieredReceiptStore::from_config(StorageConfig::new(StorageProvider::Memory))
        .expect("memory store")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn purchase(owner: UserId, count: u32, paid: u32, cents: i64, variable: bool) -> Purchase {
    Purchase {
        id: PurchaseId::new(),
        owner,
        author: "Ana".to_string(),
        product: "Geladeira".to_string(),
        store: "Loja".to_string(),
        anchor_date: Some(date(2024, 1, 15)),
        installment_count: count,
        installments_paid: paid,
        base_amount: Money::from_cents(cents),
        variable_pricing: variable,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
