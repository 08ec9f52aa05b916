//! Receipt upload and download types.

use bytes::Bytes;

/// A receipt file submitted with a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptUpload {
    /// Original file name as sent by the client.
    pub file_name: String,
    /// Reported MIME type, if any.
    pub mime_type: Option<String>,
    /// File content.
    pub content: Bytes,
}

impl ReceiptUpload {
    /// Create an upload.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        mime_type: Option<&str>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.filter(|m| !m.is_empty()).map(String::from),
            content: content.into(),
        }
    }

    /// Content size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// A receipt ready to be served to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    /// File content.
    pub content: Bytes,
    /// MIME type to serve.
    pub mime_type: String,
    /// Download name, without quotes.
    pub display_name: String,
}
