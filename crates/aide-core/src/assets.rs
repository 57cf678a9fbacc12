//! Loading of user-supplied media files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// A file the user handed to an analysis request. Exists only for the
/// duration of that request; never recorded in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    pub mime_type: String,
    pub size_bytes: u64,
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
}

/// Maps a file extension onto the MIME type the generative API expects.
/// Unknown extensions get a generic type and are rejected by validation.
fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// Reads a file into an [`UploadedAsset`], inferring its MIME type from
/// the extension.
pub fn load_asset(path: &Path) -> io::Result<UploadedAsset> {
    let bytes = fs::read(path)?;
    Ok(UploadedAsset {
        mime_type: mime_type_for(path).to_string(),
        size_bytes: bytes.len() as u64,
        bytes,
        file_name: path
            .file_name()
            .map(|s| s.to_string_lossy().to_string()),
    })
}
