//! Code analysis agent: explain, debug or optimize a pasted snippet.

use aide_core::history::ConversationEntry;
use aide_core::provider::GenerativeProvider;
use aide_core::session::Session;
use aide_core::streaming::aggregate;
use aide_core::validate::{validate_text, MAX_SNIPPET_CHARS};

use crate::error::AgentError;
use crate::event::AgentEvent;

/// Model the code helper runs on by default.
pub const CODE_MODEL: &str = "gemini-pro";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTask {
    Explain,
    Debug,
    Optimize,
}

impl AnalysisTask {
    /// Label used in the recorded user turn.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisTask::Explain => "Explain the Code",
            AnalysisTask::Debug => "Debug the Code",
            AnalysisTask::Optimize => "Optimize the Code",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            AnalysisTask::Explain => {
                "Explain this code in detail, including its purpose, functionality, and key concepts:"
            }
            AnalysisTask::Debug => {
                "Analyze this code for potential issues and provide debugging suggestions:"
            }
            AnalysisTask::Optimize => {
                "Suggest optimizations for this code, explaining the improvements:"
            }
        }
    }
}

/// Builds the model prompt for `task` over a snippet.
pub fn build_analysis_prompt(task: AnalysisTask, code: &str) -> String {
    format!("{}\n\n{}", task.instruction(), code)
}

/// Runs one analysis exchange. Same log discipline as the chat agent: the
/// log changes only after a complete reply.
pub async fn run_code_analysis<F>(
    provider: &dyn GenerativeProvider,
    session: &mut Session,
    snippet: &str,
    task: AnalysisTask,
    on_event: &mut F,
) -> Result<String, AgentError>
where
    F: FnMut(AgentEvent),
{
    on_event(AgentEvent::Validating);
    let code = validate_text(snippet, MAX_SNIPPET_CHARS)?;

    on_event(AgentEvent::Dispatching);
    let prompt = build_analysis_prompt(task, &code);
    let fragments = provider.stream_chat(session.log.entries(), &prompt).await?;
    let reply = aggregate(fragments, |partial| {
        on_event(AgentEvent::Streaming {
            partial: partial.to_string(),
        })
    })
    .await?;

    session.log.append(ConversationEntry::user(format!(
        "Task: {}\nCode:\n{}",
        task.label(),
        code
    )));
    session.log.append(ConversationEntry::assistant(reply.clone()));
    on_event(AgentEvent::Completed);
    Ok(reply)
}
