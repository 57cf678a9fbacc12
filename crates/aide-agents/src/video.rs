//! Video summarization agent: upload, wait for remote processing, analyze.

use std::time::Duration;

use aide_core::assets::UploadedAsset;
use aide_core::error::UpstreamError;
use aide_core::provider::{FileState, GenerativeProvider};
use aide_core::validate::{validate_asset, validate_text, MAX_PROMPT_CHARS, MAX_VIDEO_BYTES, VIDEO_TYPES};

use crate::error::AgentError;
use crate::event::AgentEvent;

/// Model the video summarizer runs on by default.
pub const VIDEO_MODEL: &str = "gemini-2.0-flash-exp";

/// Pause between file-state polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

fn analysis_prompt(query: &str) -> String {
    format!(
        "Analyze the uploaded video for content and context.\n\
         Query: {}\n\n\
         Provide a detailed response with:\n\
         1. Main points and key moments\n\
         2. Relevant timestamps\n\
         3. Context and insights\n\
         4. Summary and recommendations",
        query
    )
}

/// Summarizes one video with respect to `query`.
///
/// The uploaded file is polled at `poll_interval` until the remote store
/// reports it ready; a single upstream failure anywhere aborts the request.
pub async fn run_video_summary<F>(
    provider: &dyn GenerativeProvider,
    asset: &UploadedAsset,
    query: &str,
    poll_interval: Duration,
    on_event: &mut F,
) -> Result<String, AgentError>
where
    F: FnMut(AgentEvent),
{
    on_event(AgentEvent::Validating);
    validate_asset(asset, MAX_VIDEO_BYTES, VIDEO_TYPES)?;
    let query = validate_text(query, MAX_PROMPT_CHARS)?;

    on_event(AgentEvent::Uploading);
    let mut file = provider.upload_file(asset).await?;

    while file.state == FileState::Processing {
        on_event(AgentEvent::Processing);
        tokio::time::sleep(poll_interval).await;
        file = provider.get_file(&file.name).await?;
    }
    if file.state == FileState::Failed {
        return Err(UpstreamError::FileProcessingFailed(format!(
            "remote processing of '{}' failed",
            file.name
        ))
        .into());
    }

    on_event(AgentEvent::Analyzing);
    let summary = provider
        .generate_with_file(&file, &analysis_prompt(&query))
        .await?;
    on_event(AgentEvent::Completed);
    Ok(summary)
}
