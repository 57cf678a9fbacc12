/// Progress notifications emitted while a request moves through its
/// lifecycle: validating, dispatching, then either streaming fragments or
/// the upload/process/analyze sequence of a long-running analysis.
///
/// Rejection and failure are not events; they travel through the
/// controller's `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    Validating,
    Dispatching,
    /// The accumulated reply text after another fragment arrived.
    Streaming { partial: String },
    /// The asset is being handed to the remote file store.
    Uploading,
    /// The remote file store has not finished processing the asset yet.
    Processing,
    /// The ready asset is being analyzed.
    Analyzing,
    Completed,
}
