use aide_core::error::{AggregationError, UpstreamError, ValidationError};
use thiserror::Error;

/// Anything that can stop an agent request between validation and the
/// final log update.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Stream(#[from] AggregationError),
}

impl AgentError {
    /// Whether this is a pre-flight rejection rather than a downstream
    /// failure. Rejections are warnings to the user, not errors to log.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AgentError::Validation(_))
    }
}
