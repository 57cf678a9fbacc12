//! Error taxonomy shared across the workspace.

use thiserror::Error;

/// Pre-flight rejection of a request before anything is dispatched.
///
/// These are always handled locally: they block the request and produce a
/// user-visible warning, and never reach the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("input is empty")]
    EmptyInput,

    #[error("input is {length} characters long, the limit is {max}")]
    TooLong { length: usize, max: usize },

    #[error("file is {size} bytes, the limit is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("unsupported file type '{mime_type}'")]
    UnsupportedType { mime_type: String },
}

/// Any failure reported by the generative API or the transport under it.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to the generative API failed: {0}")]
    Transport(String),

    #[error("generative API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not parse the generative API response: {0}")]
    MalformedResponse(String),

    #[error("remote file processing failed: {0}")]
    FileProcessingFailed(String),
}

/// A streamed response died mid-flight.
///
/// Carries whatever text had been accumulated so far; the caller decides
/// what to do with it, but the conversation log must stay unchanged.
#[derive(Debug, Error)]
#[error("response stream failed after {} streamed characters: {cause}", .partial.len())]
pub struct AggregationError {
    pub partial: String,
    #[source]
    pub cause: UpstreamError,
}

/// Failure to resolve or manage the API credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("GEMINI_API_KEY not found in the environment or the key store")]
    Missing,

    #[error("failed to access the key store: {0}")]
    Store(String),
}
