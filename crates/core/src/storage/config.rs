//! Receipt store settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use dividas_shared::config::ReceiptsConfig;

/// Backend of the writable receipt tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageProvider {
    /// Receipt directory on disk, e.g. `./public/comprovantes`.
    Directory {
        /// Directory holding the files.
        root: PathBuf,
    },
    /// Process memory; contents vanish on exit.
    Memory,
}

impl StorageProvider {
    /// Receipts kept under `root`.
    #[must_use]
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self::Directory { root: root.into() }
    }

    /// Label for log lines.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Directory { .. } => "directory",
            Self::Memory => "memory",
        }
    }
}

/// Receipt store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Writable tier.
    pub provider: StorageProvider,
    /// Base URL of a read-only mirror tried when the writable tier has no such file.
    pub mirror_url: Option<String>,
    /// Largest accepted upload, in bytes.
    pub max_file_size: u64,
    /// Accepted upload MIME types.
    pub accepted_types: Vec<String>,
}

impl StorageConfig {
    /// Upload limit when none is configured.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// PDF plus the image formats phones and banking apps export.
    const RECEIPT_TYPES: [&'static str; 5] = [
        "application/pdf",
        "image/png",
        "image/jpeg",
        "image/jpg",
        "image/webp",
    ];

    /// Settings for `provider` with the receipt defaults and no mirror.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            mirror_url: None,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            accepted_types: Self::RECEIPT_TYPES.map(String::from).to_vec(),
        }
    }

    /// Directory store described by the application config.
    #[must_use]
    pub fn from_receipts(config: &ReceiptsConfig) -> Self {
        Self {
            mirror_url: config.mirror_url.clone(),
            max_file_size: config.max_file_size,
            ..Self::new(StorageProvider::directory(config.root.clone()))
        }
    }

    /// Cap uploads at `bytes`.
    #[must_use]
    pub fn limit_uploads_to(self, bytes: u64) -> Self {
        Self {
            max_file_size: bytes,
            ..self
        }
    }

    /// Fall back to the mirror at `url` on reads.
    #[must_use]
    pub fn mirrored_at(self, url: impl Into<String>) -> Self {
        Self {
            mirror_url: Some(url.into()),
            ..self
        }
    }

    /// Accept only `types` at upload.
    #[must_use]
    pub fn accepting(self, types: &[&str]) -> Self {
        Self {
            accepted_types: types.iter().map(ToString::to_string).collect(),
            ..self
        }
    }

    /// Returns true when uploads of `mime_type` are accepted.
    #[must_use]
    pub fn accepts(&self, mime_type: &str) -> bool {
        self.accepted_types.iter().any(|t| t == mime_type)
    }
}
