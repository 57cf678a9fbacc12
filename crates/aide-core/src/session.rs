//! Process-wide session registry.
//!
//! Sessions are an explicit context object handed to every operation rather
//! than ambient global state. Each session owns one conversation log and an
//! optional API-key override; nothing here is persisted to disk.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use std::collections::HashMap;

use crate::history::ConversationLog;

fn generate_session_id() -> String {
    let random_part: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("sess-{}", random_part.to_lowercase())
}

/// The state scoped to one user's active interaction period.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    pub log: ConversationLog,
    /// User-supplied credential that overrides the process-wide default.
    pub api_key_override: Option<String>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Session {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            log: ConversationLog::new(),
            api_key_override: None,
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}

/// Registry mapping opaque session ids to their state.
///
/// One writer per session: a request runs to completion before the next is
/// accepted for that session, so no interior locking is needed. Different
/// sessions are fully independent.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh session and returns its id.
    pub fn create(&mut self) -> String {
        let id = generate_session_id();
        self.sessions.insert(id.clone(), Session::new(id.clone()));
        id
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Mutable access for the session's single writer. Marks the session
    /// as active.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        let session = self.sessions.get_mut(id)?;
        session.touch();
        Some(session)
    }

    /// Tears a session down. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drops every session idle for longer than `max_idle`; returns how
    /// many were expired.
    pub fn expire_idle(&mut self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.last_active >= cutoff);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
