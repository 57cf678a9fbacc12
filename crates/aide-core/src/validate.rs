//! Pre-flight request validation.
//!
//! Every check here is pure and synchronous; they gate whether a request is
//! dispatched at all and never perform I/O themselves.

use crate::assets::UploadedAsset;
use crate::error::ValidationError;

/// Character limit for chat prompts.
pub const MAX_PROMPT_CHARS: usize = 1000;

/// Character limit for pasted code snippets.
pub const MAX_SNIPPET_CHARS: usize = 20_000;

/// Byte limit for uploaded images.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Byte limit for uploaded videos.
pub const MAX_VIDEO_BYTES: u64 = 200 * 1024 * 1024;

/// MIME types accepted for image analysis.
pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// MIME types accepted for video summarization.
pub const VIDEO_TYPES: &[&str] = &["video/mp4", "video/quicktime", "video/x-msvideo"];

/// Trims surrounding whitespace and enforces the length bound.
pub fn validate_text(input: &str, max_length: usize) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    let length = trimmed.chars().count();
    if length > max_length {
        return Err(ValidationError::TooLong {
            length,
            max: max_length,
        });
    }
    Ok(trimmed.to_string())
}

/// Checks an uploaded asset against a size limit and an allowed-type set.
/// Passes the asset through unchanged on success.
pub fn validate_asset<'a>(
    asset: &'a UploadedAsset,
    max_size_bytes: u64,
    allowed_types: &[&str],
) -> Result<&'a UploadedAsset, ValidationError> {
    if asset.size_bytes > max_size_bytes {
        return Err(ValidationError::TooLarge {
            size: asset.size_bytes,
            max: max_size_bytes,
        });
    }
    if !allowed_types.contains(&asset.mime_type.as_str()) {
        return Err(ValidationError::UnsupportedType {
            mime_type: asset.mime_type.clone(),
        });
    }
    Ok(asset)
}
