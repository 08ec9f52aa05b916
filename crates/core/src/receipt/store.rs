//! Receipt store trait.

use std::future::Future;

use bytes::Bytes;

use super::types::ReceiptUpload;
use crate::schedule::ReceiptRef;
use crate::storage::StorageError;

/// Blob storage for receipt files.
///
/// Locations returned by [`ReceiptStore::put`] are opaque to callers and are
/// passed back unchanged to `fetch` and `delete`.
pub trait ReceiptStore: Send + Sync {
    /// Validate and store an upload under a fresh name.
    fn put(
        &self,
        upload: ReceiptUpload,
    ) -> impl Future<Output = Result<ReceiptRef, StorageError>> + Send;

    /// Read a stored receipt.
    fn fetch(&self, location: &str) -> impl Future<Output = Result<Bytes, StorageError>> + Send;

    /// Remove a stored receipt.
    fn delete(&self, location: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
