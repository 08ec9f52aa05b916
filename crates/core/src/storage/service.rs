//! Tiered receipt store implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Builder, ErrorKind, Operator, services};
use tracing::{debug, warn};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use crate::receipt::{ReceiptStore, ReceiptUpload, display_name, stored_name};
use crate::schedule::ReceiptRef;

/// Receipt store with a writable primary tier and an optional read-only mirror.
///
/// Reads that miss the primary tier are retried against the mirror. Writes
/// and deletes only ever touch the primary.
pub struct TieredReceiptStore {
    primary: Operator,
    mirror: Option<Operator>,
    config: StorageConfig,
}

impl TieredReceiptStore {
    /// Build both tiers from configuration.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` if a tier cannot be built.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let primary = match &config.provider {
            StorageProvider::Directory { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("receipt directory is not UTF-8"))?;
                operator(services::Fs::default().root(root))?
            }
            StorageProvider::Memory => operator(services::Memory::default())?,
        };
        let mirror = match config.mirror_url.as_deref() {
            Some(url) => Some(operator(services::Http::default().endpoint(url))?),
            None => None,
        };
        Ok(Self::from_operators(config, primary, mirror))
    }

    /// Wrap operators that were built elsewhere.
    #[must_use]
    pub fn from_operators(config: StorageConfig, primary: Operator, mirror: Option<Operator>) -> Self {
        Self {
            primary,
            mirror,
            config,
        }
    }

    /// Check an upload against the size limit and accepted types.
    ///
    /// Uploads without a MIME type are accepted.
    ///
    /// # Errors
    ///
    /// Returns `FileTooLarge` or `InvalidMimeType`.
    pub fn validate_upload(&self, mime_type: Option<&str>, size: u64) -> Result<(), StorageError> {
        let max = self.config.max_file_size;
        if size > max {
            return Err(StorageError::file_too_large(size, max));
        }
        match mime_type {
            Some(mime_type) if !self.config.accepts(mime_type) => {
                Err(StorageError::invalid_mime_type(mime_type))
            }
            _ => Ok(()),
        }
    }

    /// Label of the primary tier.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    async fn read_mirror(&self, location: &str) -> Result<Bytes, StorageError> {
        let Some(mirror) = &self.mirror else {
            return Err(StorageError::not_found(location));
        };

        warn!(location, "receipt missing from primary tier, reading mirror");
        match mirror.read(location).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(location)),
            Err(e) => Err(e.into()),
        }
    }
}

fn operator<B: Builder>(builder: B) -> Result<Operator, StorageError> {
    Operator::new(builder)
        .map(|op| op.finish())
        .map_err(|e| StorageError::configuration(e.to_string()))
}

impl ReceiptStore for TieredReceiptStore {
    async fn put(&self, upload: ReceiptUpload) -> Result<ReceiptRef, StorageError> {
        self.validate_upload(upload.mime_type.as_deref(), upload.size())?;

        let location = stored_name(&upload.file_name);
        self.primary.write(&location, upload.content).await?;
        debug!(location = %location, provider = self.provider_name(), "receipt stored");

        Ok(ReceiptRef {
            location,
            display_name: display_name(&upload.file_name),
            mime_type: upload.mime_type,
        })
    }

    async fn fetch(&self, location: &str) -> Result<Bytes, StorageError> {
        match self.primary.read(location).await {
            Ok(buffer) => Ok(buffer.to_bytes()),
            Err(e) if e.kind() == ErrorKind::NotFound => self.read_mirror(location).await,
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, location: &str) -> Result<(), StorageError> {
        self.primary.delete(location).await.map_err(StorageError::from)
    }
}
