use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::assets::UploadedAsset;
use crate::error::UpstreamError;
use crate::history::ConversationEntry;

/// A lazy, finite sequence of reply fragments in arrival order.
pub type FragmentStream = BoxStream<'static, Result<String, UpstreamError>>;

/// Processing state of a file held by the remote file store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileState {
    Processing,
    Active,
    Failed,
}

/// Handle to an asset uploaded to the remote file store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    pub uri: String,
    pub mime_type: String,
    pub state: FileState,
}

/// Seam between the agent controllers and the hosted generative API.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Streams the reply to `prompt`, replaying `history` as prior turns.
    async fn stream_chat(
        &self,
        history: &[ConversationEntry],
        prompt: &str,
    ) -> Result<FragmentStream, UpstreamError>;

    /// One-shot generation over an inline image plus a prompt.
    async fn generate_with_image(
        &self,
        asset: &UploadedAsset,
        prompt: &str,
    ) -> Result<String, UpstreamError>;

    /// Hands a large asset to the remote file store.
    async fn upload_file(&self, asset: &UploadedAsset) -> Result<RemoteFile, UpstreamError>;

    /// Re-reads a remote file's metadata, primarily to observe its state.
    async fn get_file(&self, name: &str) -> Result<RemoteFile, UpstreamError>;

    /// One-shot generation over a previously uploaded, ready file.
    async fn generate_with_file(
        &self,
        file: &RemoteFile,
        prompt: &str,
    ) -> Result<String, UpstreamError>;
}
