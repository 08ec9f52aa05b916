//! Receipt file names.

use percent_encoding::percent_decode_str;
use uuid::Uuid;

use super::error::ReceiptError;

/// Display name used when an upload carries no usable file name.
pub const DEFAULT_DISPLAY_NAME: &str = "comprovante";

/// Validates a requested receipt file name.
///
/// The name is percent-decoded first. It must be a single path segment made
/// of ASCII letters, digits, `.`, `_` and `-`, and must not contain `..`.
///
/// # Errors
///
/// Returns `ReceiptError::InvalidFileName` when any rule fails.
pub fn safe_file_name(raw: &str) -> Result<String, ReceiptError> {
    let invalid = || ReceiptError::InvalidFileName(raw.to_string());

    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| invalid())?;

    if decoded.is_empty() || decoded == "." {
        return Err(invalid());
    }
    if decoded.contains(['/', '\\']) || decoded.contains("..") {
        return Err(invalid());
    }
    if !decoded
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(invalid());
    }

    Ok(decoded.into_owned())
}

/// MIME type inferred from a file extension.
#[must_use]
pub fn guess_mime(file_name: &str) -> &'static str {
    match extension(file_name).as_str() {
        ".pdf" => "application/pdf",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Base name of an uploaded file, with any directory components removed.
#[must_use]
pub fn display_name(original: &str) -> String {
    original
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DISPLAY_NAME)
        .to_string()
}

/// Fresh storage name: a random UUID followed by the lowercased extension
/// of the original name.
#[must_use]
pub fn stored_name(original: &str) -> String {
    let ext: String = extension(&display_name(original))
        .chars()
        .filter(|c| *c == '.' || c.is_ascii_alphanumeric())
        .collect();
    let ext = if ext == "." { String::new() } else { ext };
    format!("{}{ext}", Uuid::new_v4())
}

/// Lowercased extension including the dot; empty for dotfiles and names without one.
fn extension(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[idx..].to_ascii_lowercase(),
        _ => String::new(),
    }
}
