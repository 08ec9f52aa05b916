//! Payment receipts.
//!
//! This module provides:
//! - Upload and download types
//! - File name sanitisation and MIME inference
//! - The `ReceiptStore` seam implemented by `crate::storage`
//! - Owner-checked receipt access

mod error;
mod naming;
mod service;
mod store;
mod types;

pub use error::ReceiptError;
pub use naming::{DEFAULT_DISPLAY_NAME, display_name, guess_mime, safe_file_name, stored_name};
pub use service::ReceiptService;
pub use store::ReceiptStore;
pub use types::{ReceiptFile, ReceiptUpload};
