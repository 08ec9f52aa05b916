//! Receipt access service.

use std::sync::Arc;

use dividas_shared::types::UserId;
use tracing::debug;

use super::error::ReceiptError;
use super::naming::{guess_mime, safe_file_name};
use super::store::ReceiptStore;
use super::types::ReceiptFile;
use crate::repository::PurchaseRepository;

/// Serves stored receipts to the owner of the purchase they belong to.
pub struct ReceiptService<R: PurchaseRepository, S: ReceiptStore> {
    repo: Arc<R>,
    store: Arc<S>,
}

impl<R: PurchaseRepository, S: ReceiptStore> ReceiptService<R, S> {
    /// Create a new receipt service.
    #[must_use]
    pub fn new(repo: Arc<R>, store: Arc<S>) -> Self {
        Self { repo, store }
    }

    /// Open a receipt by its stored file name.
    ///
    /// Ownership is derived from the purchase holding the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name fails sanitisation
    /// - No payment references the receipt
    /// - The purchase belongs to another owner
    /// - The file cannot be read from storage
    pub async fn open(&self, owner: UserId, raw_file_name: &str) -> Result<ReceiptFile, ReceiptError> {
        let file_name = safe_file_name(raw_file_name)?;

        let record = self
            .repo
            .find_by_receipt_location(&file_name)
            .await?
            .ok_or_else(|| ReceiptError::NotFound(file_name.clone()))?;

        let purchase = self
            .repo
            .find_purchase(record.purchase_id)
            .await?
            .ok_or_else(|| ReceiptError::NotFound(file_name.clone()))?;

        if purchase.owner != owner {
            return Err(ReceiptError::Forbidden(file_name));
        }

        let content = self.store.fetch(&file_name).await?;
        debug!(purchase_id = %purchase.id, size = content.len(), "receipt served");

        let receipt = record.receipt;
        let mime_type = receipt
            .as_ref()
            .and_then(|r| r.mime_type.clone())
            .unwrap_or_else(|| guess_mime(&file_name).to_string());
        let display_name = receipt
            .map(|r| r.display_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| file_name.clone())
            .replace('"', "");

        Ok(ReceiptFile {
            content,
            mime_type,
            display_name,
        })
    }
}
