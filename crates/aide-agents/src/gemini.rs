//! Client for the hosted Gemini REST API: streamed text generation,
//! inline-image generation and the File API used for video analysis.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::collections::VecDeque;

use aide_core::assets::UploadedAsset;
use aide_core::error::UpstreamError;
use aide_core::history::{ConversationEntry, Role};
use aide_core::provider::{FileState, FragmentStream, GenerativeProvider, RemoteFile};

const BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fallback model when a caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-pro";

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn model_url(&self, endpoint: &str) -> String {
        format!("{}/v1beta/models/{}:{}", BASE_URL, self.model, endpoint)
    }

    async fn post_generate(&self, body: serde_json::Value) -> Result<String, UpstreamError> {
        let response = self
            .client
            .post(self.model_url("generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;
        let text = parsed.text();
        if text.is_empty() {
            return Err(UpstreamError::MalformedResponse(
                "response contained no text parts".to_string(),
            ));
        }
        Ok(text)
    }
}

fn transport(e: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport(e.to_string())
}

/// Turns a non-success response into a typed upstream error, pulling the
/// message out of the API's error envelope when there is one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(UpstreamError::Api {
        status: status.as_u16(),
        message,
    })
}

// --- Structs for deserializing generate responses ---

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize, Debug)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize, Debug)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        let mut out = String::new();
        for candidate in &self.candidates {
            if let Some(content) = &candidate.content {
                for part in &content.parts {
                    if let Some(text) = &part.text {
                        out.push_str(text);
                    }
                }
            }
        }
        out
    }
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}

// --- File API ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct FileMetadata {
    name: String,
    uri: String,
    mime_type: Option<String>,
    state: Option<String>,
}

#[derive(Deserialize, Debug)]
struct UploadFileResponse {
    file: FileMetadata,
}

impl FileMetadata {
    fn into_remote(self, fallback_mime: &str) -> RemoteFile {
        let state = match self.state.as_deref() {
            Some("ACTIVE") => FileState::Active,
            Some("FAILED") => FileState::Failed,
            // PROCESSING and anything unrecognized: keep waiting.
            _ => FileState::Processing,
        };
        RemoteFile {
            name: self.name,
            uri: self.uri,
            mime_type: self.mime_type.unwrap_or_else(|| fallback_mime.to_string()),
            state,
        }
    }
}

/// Replays prior turns plus the new prompt in the wire layout the API
/// expects.
fn history_turns(history: &[ConversationEntry], prompt: &str) -> Vec<serde_json::Value> {
    let mut contents = Vec::with_capacity(history.len() + 1);
    for entry in history {
        let role = match entry.role {
            Role::User => "user",
            Role::Assistant => "model",
        };
        contents.push(json!({ "role": role, "parts": [{ "text": &entry.content }] }));
    }
    contents.push(json!({ "role": "user", "parts": [{ "text": prompt }] }));
    contents
}

// --- SSE fragment stream ---

struct SseState {
    response: reqwest::Response,
    buffer: Vec<u8>,
    pending: VecDeque<String>,
    done: bool,
}

/// Adapts the `alt=sse` response body into a stream of text fragments.
/// Each complete `data:` line carries one response chunk whose candidate
/// text becomes one fragment.
fn sse_fragments(response: reqwest::Response) -> FragmentStream {
    let state = SseState {
        response,
        buffer: Vec::new(),
        pending: VecDeque::new(),
        done: false,
    };

    futures::stream::try_unfold(state, |mut st| async move {
        loop {
            if let Some(fragment) = st.pending.pop_front() {
                return Ok(Some((fragment, st)));
            }
            if st.done {
                return Ok(None);
            }
            match st.response.chunk().await.map_err(transport)? {
                Some(bytes) => {
                    st.buffer.extend_from_slice(&bytes);
                    // Only complete lines are parsed; a multi-byte character
                    // split across network chunks stays in the buffer.
                    while let Some(pos) = st.buffer.iter().position(|b| *b == b'\n') {
                        let line: Vec<u8> = st.buffer.drain(..=pos).collect();
                        if let Some(fragment) = parse_sse_line(&line)? {
                            if !fragment.is_empty() {
                                st.pending.push_back(fragment);
                            }
                        }
                    }
                }
                None => {
                    st.done = true;
                    let rest = std::mem::take(&mut st.buffer);
                    if let Some(fragment) = parse_sse_line(&rest)? {
                        if !fragment.is_empty() {
                            st.pending.push_back(fragment);
                        }
                    }
                }
            }
        }
    })
    .boxed()
}

/// `data:` lines carry a response chunk; everything else is SSE framing
/// and is skipped.
fn parse_sse_line(raw: &[u8]) -> Result<Option<String>, UpstreamError> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    let Some(payload) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(None);
    }
    let chunk: GenerateContentResponse = serde_json::from_str(payload)
        .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;
    Ok(Some(chunk.text()))
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn stream_chat(
        &self,
        history: &[ConversationEntry],
        prompt: &str,
    ) -> Result<FragmentStream, UpstreamError> {
        let url = format!("{}?alt=sse", self.model_url("streamGenerateContent"));
        let body = json!({ "contents": history_turns(history, prompt) });

        tracing::debug!(model = %self.model, turns = history.len() + 1, "dispatching streaming request");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;
        Ok(sse_fragments(response))
    }

    async fn generate_with_image(
        &self,
        asset: &UploadedAsset,
        prompt: &str,
    ) -> Result<String, UpstreamError> {
        let encoded = STANDARD.encode(&asset.bytes);
        let body = json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": &asset.mime_type, "data": encoded } },
                    { "text": prompt }
                ]
            }]
        });
        self.post_generate(body).await
    }

    async fn upload_file(&self, asset: &UploadedAsset) -> Result<RemoteFile, UpstreamError> {
        // Two-step resumable upload: announce the file, then push the bytes
        // to the session URL the announcement returns.
        let display_name = asset
            .file_name
            .clone()
            .unwrap_or_else(|| "upload".to_string());

        let start = self
            .client
            .post(format!("{}/upload/v1beta/files", BASE_URL))
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", asset.size_bytes.to_string())
            .header("X-Goog-Upload-Header-Content-Type", &asset.mime_type)
            .json(&json!({ "file": { "display_name": display_name } }))
            .send()
            .await
            .map_err(transport)?;
        let start = check_status(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                UpstreamError::MalformedResponse(
                    "upload start response had no x-goog-upload-url header".to_string(),
                )
            })?
            .to_string();

        let finalize = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(asset.bytes.clone())
            .send()
            .await
            .map_err(transport)?;
        let finalize = check_status(finalize).await?;

        let uploaded: UploadFileResponse = finalize
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;
        Ok(uploaded.file.into_remote(&asset.mime_type))
    }

    async fn get_file(&self, name: &str) -> Result<RemoteFile, UpstreamError> {
        // `name` already carries its `files/` prefix.
        let response = self
            .client
            .get(format!("{}/v1beta/{}", BASE_URL, name))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(transport)?;
        let response = check_status(response).await?;

        let metadata: FileMetadata = response
            .json()
            .await
            .map_err(|e| UpstreamError::MalformedResponse(e.to_string()))?;
        Ok(metadata.into_remote("application/octet-stream"))
    }

    async fn generate_with_file(
        &self,
        file: &RemoteFile,
        prompt: &str,
    ) -> Result<String, UpstreamError> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "file_data": { "mime_type": &file.mime_type, "file_uri": &file.uri } },
                    { "text": prompt }
                ]
            }]
        });
        self.post_generate(body).await
    }
}
