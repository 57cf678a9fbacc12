use std::sync::Mutex;

use aide_agents::chat::run_chat_turn;
use aide_agents::code::{run_code_analysis, AnalysisTask};
use aide_agents::error::AgentError;
use aide_agents::event::AgentEvent;
use aide_core::error::{UpstreamError, ValidationError};
use aide_core::history::Role;
use aide_core::provider::{FragmentStream, GenerativeProvider, RemoteFile};
use aide_core::session::SessionStore;
use async_trait::async_trait;
use futures::StreamExt;

/// Provider that replays a scripted fragment sequence for the next
/// streaming call and records what history it was shown.
struct ScriptedProvider {
    script: Mutex<Vec<Result<String, UpstreamError>>>,
    seen_history_len: Mutex<Option<usize>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Result<String, UpstreamError>>) -> Self {
        Self {
            script: Mutex::new(script),
            seen_history_len: Mutex::new(None),
        }
    }

    fn was_called(&self) -> bool {
        self.seen_history_len.lock().unwrap().is_some()
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedProvider {
    async fn stream_chat(
        &self,
        history: &[aide_core::history::ConversationEntry],
        _prompt: &str,
    ) -> Result<FragmentStream, UpstreamError> {
        *self.seen_history_len.lock().unwrap() = Some(history.len());
        let script = std::mem::take(&mut *self.script.lock().unwrap());
        Ok(futures::stream::iter(script).boxed())
    }

    async fn generate_with_image(
        &self,
        _asset: &aide_core::assets::UploadedAsset,
        _prompt: &str,
    ) -> Result<String, UpstreamError> {
        unimplemented!("not exercised by chat flows")
    }

    async fn upload_file(
        &self,
        _asset: &aide_core::assets::UploadedAsset,
    ) -> Result<RemoteFile, UpstreamError> {
        unimplemented!("not exercised by chat flows")
    }

    async fn get_file(&self, _name: &str) -> Result<RemoteFile, UpstreamError> {
        unimplemented!("not exercised by chat flows")
    }

    async fn generate_with_file(
        &self,
        _file: &RemoteFile,
        _prompt: &str,
    ) -> Result<String, UpstreamError> {
        unimplemented!("not exercised by chat flows")
    }
}

#[tokio::test]
async fn test_successful_turn_records_user_then_assistant() {
    let provider = ScriptedProvider::new(vec![Ok("Hi".to_string()), Ok(" there!".to_string())]);
    let mut store = SessionStore::new();
    let id = store.create();
    let session = store.get_mut(&id).unwrap();

    let mut events = Vec::new();
    let reply = run_chat_turn(&provider, session, "Hi", &mut |e| events.push(e))
        .await
        .unwrap();

    assert_eq!(reply, "Hi there!");

    let entries = session.log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].role, Role::User);
    assert_eq!(entries[0].content, "Hi");
    assert_eq!(entries[1].role, Role::Assistant);
    assert_eq!(entries[1].content, "Hi there!");

    assert_eq!(
        events,
        vec![
            AgentEvent::Validating,
            AgentEvent::Dispatching,
            AgentEvent::Streaming {
                partial: "Hi".to_string()
            },
            AgentEvent::Streaming {
                partial: "Hi there!".to_string()
            },
            AgentEvent::Completed,
        ]
    );
}

#[tokio::test]
async fn test_mid_stream_failure_leaves_the_log_unchanged() {
    let provider = ScriptedProvider::new(vec![
        Ok("Hi".to_string()),
        Err(UpstreamError::Transport("connection reset".to_string())),
    ]);
    let mut store = SessionStore::new();
    let id = store.create();
    let session = store.get_mut(&id).unwrap();

    let err = run_chat_turn(&provider, session, "Hello?", &mut |_| ())
        .await
        .unwrap_err();

    match err {
        AgentError::Stream(e) => assert_eq!(e.partial, "Hi"),
        other => panic!("expected a stream error, got {:?}", other),
    }
    // No user or assistant turn was added for the failed attempt.
    assert!(session.log.is_empty());
}

#[tokio::test]
async fn test_rejected_input_never_reaches_the_provider() {
    let provider = ScriptedProvider::new(vec![Ok("unused".to_string())]);
    let mut store = SessionStore::new();
    let id = store.create();
    let session = store.get_mut(&id).unwrap();

    let err = run_chat_turn(&provider, session, "   ", &mut |_| ())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AgentError::Validation(ValidationError::EmptyInput)
    ));
    assert!(err.is_rejection());
    assert!(!provider.was_called());
    assert!(session.log.is_empty());
}

#[tokio::test]
async fn test_over_long_input_is_rejected() {
    let provider = ScriptedProvider::new(vec![]);
    let mut store = SessionStore::new();
    let id = store.create();
    let session = store.get_mut(&id).unwrap();

    let input = "x".repeat(1001);
    let err = run_chat_turn(&provider, session, &input, &mut |_| ())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AgentError::Validation(ValidationError::TooLong { length: 1001, .. })
    ));
    assert!(!provider.was_called());
}

#[tokio::test]
async fn test_prior_turns_are_replayed_to_the_provider() {
    let mut store = SessionStore::new();
    let id = store.create();

    for i in 0..3 {
        let provider = ScriptedProvider::new(vec![Ok(format!("reply {}", i))]);
        let session = store.get_mut(&id).unwrap();
        let expected_history = session.log.len();
        run_chat_turn(&provider, session, &format!("question {}", i), &mut |_| ())
            .await
            .unwrap();
        assert_eq!(
            *provider.seen_history_len.lock().unwrap(),
            Some(expected_history)
        );
    }

    // Three exchanges leave six turns.
    assert_eq!(store.get(&id).unwrap().log.len(), 6);
}

#[tokio::test]
async fn test_long_conversations_stay_bounded() {
    let mut store = SessionStore::new();
    let id = store.create();

    for i in 0..15 {
        let provider = ScriptedProvider::new(vec![Ok("ok".to_string())]);
        let session = store.get_mut(&id).unwrap();
        run_chat_turn(&provider, session, &format!("message {}", i), &mut |_| ())
            .await
            .unwrap();
    }

    // 30 turns were appended; only the newest 20 survive.
    let log = &store.get(&id).unwrap().log;
    assert_eq!(log.len(), 20);
    assert_eq!(log.entries()[0].content, "message 5");
}

#[tokio::test]
async fn test_code_analysis_records_the_task_labelled_turn() {
    let provider = ScriptedProvider::new(vec![Ok("looks fine".to_string())]);
    let mut store = SessionStore::new();
    let id = store.create();
    let session = store.get_mut(&id).unwrap();

    let reply = run_code_analysis(
        &provider,
        session,
        "fn main() {}",
        AnalysisTask::Debug,
        &mut |_| (),
    )
    .await
    .unwrap();

    assert_eq!(reply, "looks fine");
    let entries = session.log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0].content,
        "Task: Debug the Code\nCode:\nfn main() {}"
    );
    assert_eq!(entries[1].content, "looks fine");
}

#[tokio::test]
async fn test_empty_snippet_is_rejected() {
    let provider = ScriptedProvider::new(vec![]);
    let mut store = SessionStore::new();
    let id = store.create();
    let session = store.get_mut(&id).unwrap();

    let err = run_code_analysis(&provider, session, "\n\n", AnalysisTask::Explain, &mut |_| ())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AgentError::Validation(ValidationError::EmptyInput)
    ));
    assert!(session.log.is_empty());
}
