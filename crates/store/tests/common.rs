//! Shared fixtures for store integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use dividas_core::storage::{StorageConfig, StorageProvider, TieredReceiptStore};
use dividas_core::schedule::Purchase;
use dividas_shared::types::{Money, PurchaseId, UserId};
use dividas_store::InMemoryRepository;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn repository() -> Arc<InMemoryRepository> {
    let repo = InMemoryRepository::new();
    repo.initialize();
    Arc::new(repo)
}

pub fn receipt_store() -> Arc<TieredReceiptStore> {
    Arc::new(TieredReceiptStore::from_config(StorageConfig::new(StorageProvider::Memory)).unwrap())
}

pub fn purchase(owner: UserId, count: u32, paid: u32, cents: i64, variable: bool) -> Purchase {
    Purchase {
        id: PurchaseId::new(),
        owner,
        author: "Bruno".to_string(),
        product: "Notebook".to_string(),
        store: "Magazine".to_string(),
        anchor_date: Some(date(2024, 1, 15)),
        installment_count: count,
        installments_paid: paid,
        base_amount: Money::from_cents(cents),
        variable_pricing: variable,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
