//! Purchase storage for Dividas.
//!
//! This crate provides:
//! - `InMemoryRepository`, a `DashMap`-backed `PurchaseRepository`
//! - JSON snapshots for seeding a repository

mod memory;
mod snapshot;

pub use memory::InMemoryRepository;
pub use snapshot::{Snapshot, SnapshotError};
