//! Receipt storage using Apache OpenDAL.
//!
//! Receipts are written to a directory (or process memory in tests) and
//! read back from there, falling back to a read-only HTTP mirror for files
//! that only exist remotely.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                TieredReceiptStore                │
//! ├──────────────────────────┬───────────────────────┤
//! │ primary: read/write/del  │ mirror: read-only     │
//! │ fs | memory              │ http, on NotFound     │
//! └──────────────────────────┴───────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::TieredReceiptStore;
