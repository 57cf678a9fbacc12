//! Conversational agent: one validated prompt in, one streamed reply out,
//! both recorded as turns once the reply is complete.

use aide_core::history::ConversationEntry;
use aide_core::provider::GenerativeProvider;
use aide_core::session::Session;
use aide_core::streaming::aggregate;
use aide_core::validate::{validate_text, MAX_PROMPT_CHARS};

use crate::error::AgentError;
use crate::event::AgentEvent;

/// Model the chat assistant runs on by default.
pub const CHAT_MODEL: &str = "gemini-pro";

/// Runs one chat exchange against the session's history.
///
/// The conversation log is updated exactly once, after the reply has fully
/// aggregated; any rejection or failure leaves it untouched.
pub async fn run_chat_turn<F>(
    provider: &dyn GenerativeProvider,
    session: &mut Session,
    input: &str,
    on_event: &mut F,
) -> Result<String, AgentError>
where
    F: FnMut(AgentEvent),
{
    on_event(AgentEvent::Validating);
    let prompt = validate_text(input, MAX_PROMPT_CHARS)?;

    on_event(AgentEvent::Dispatching);
    let fragments = provider.stream_chat(session.log.entries(), &prompt).await?;
    let reply = aggregate(fragments, |partial| {
        on_event(AgentEvent::Streaming {
            partial: partial.to_string(),
        })
    })
    .await?;

    session.log.append(ConversationEntry::user(prompt));
    session.log.append(ConversationEntry::assistant(reply.clone()));
    on_event(AgentEvent::Completed);
    Ok(reply)
}
