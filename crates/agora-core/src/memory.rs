//! Session memory store.
//!
//! Each session owns an uncapped chronological history and a long-term
//! window of exchanges. An exchange enters the window only if the
//! [`RetentionPolicy`] admits it; the window is capped and evicts in
//! insertion order (oldest first), regardless of how often an entry is read.
//!
//! Nothing here is persisted. The store is an ordinary value: build one,
//! hand it to whichever component needs it.

use std::collections::HashMap;

use agora_types::{
    config::MemoryConfig,
    message::{Exchange, Message, Role},
    session::{Session, SessionSummary},
};

/// Decides whether an exchange is worth keeping in long-term memory.
pub trait RetentionPolicy {
    fn admit(&self, input: &str, output: &str) -> bool;
}

/// Admits exchanges whose user input has more characters than the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinInputLength(pub usize);

impl RetentionPolicy for MinInputLength {
    fn admit(&self, input: &str, _output: &str) -> bool {
        input.chars().count() > self.0
    }
}

impl<F> RetentionPolicy for F
where
    F: Fn(&str, &str) -> bool,
{
    fn admit(&self, input: &str, output: &str) -> bool {
        self(input, output)
    }
}

/// Result of offering an exchange to long-term memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Rejected,
    Admitted { evicted: Vec<Exchange> },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

pub struct SessionStore {
    sessions: HashMap<String, Session>,
    policy: Box<dyn RetentionPolicy>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(policy: impl RetentionPolicy + 'static, capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            policy: Box::new(policy),
            capacity,
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(
            MinInputLength(config.retention_threshold),
            config.long_term_capacity,
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn session_mut(&mut self, key: &str) -> &mut Session {
        self.sessions
            .entry(key.to_string())
            .or_insert_with(|| {
                log::debug!("creating session {}", key);
                Session::new(key)
            })
    }

    /// The session's turn history, created empty on first reference.
    pub fn get_or_create_history(&mut self, key: &str) -> &[Message] {
        &self.session_mut(key).history
    }

    pub fn record_turn(&mut self, key: &str, role: Role, content: impl Into<String>) {
        self.session_mut(key).push_turn(Message::new(role, content));
    }

    /// Offer an exchange to long-term memory. Admitted exchanges are
    /// appended first and the window trimmed afterwards.
    pub fn update_long_term(&mut self, key: &str, input: &str, output: &str) -> Admission {
        if !self.policy.admit(input, output) {
            log::debug!("session {}: exchange not retained", key);
            return Admission::Rejected;
        }
        let capacity = self.capacity;
        let evicted = self
            .session_mut(key)
            .remember(Exchange::new(input, output), capacity);
        if !evicted.is_empty() {
            log::debug!("session {}: evicted {} exchange(s)", key, evicted.len());
        }
        Admission::Admitted { evicted }
    }

    /// Retained exchanges joined into plain text for prompt injection.
    /// Empty when nothing has been retained.
    pub fn render_long_term(&self, key: &str) -> String {
        self.sessions
            .get(key)
            .map(|s| {
                s.long_term
                    .iter()
                    .map(Exchange::render)
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
            .unwrap_or_default()
    }

    pub fn history(&self, key: &str) -> &[Message] {
        self.sessions
            .get(key)
            .map(|s| s.history.as_slice())
            .unwrap_or(&[])
    }

    pub fn long_term(&self, key: &str) -> Vec<Exchange> {
        self.sessions
            .get(key)
            .map(|s| s.long_term.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn session(&self, key: &str) -> Option<&Session> {
        self.sessions.get(key)
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        let mut out: Vec<SessionSummary> = self.sessions.values().map(Session::summary).collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Forget both memory tiers of one session. Returns false if unknown.
    pub fn reset(&mut self, key: &str) -> bool {
        match self.sessions.get_mut(key) {
            Some(session) => {
                session.clear();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::from_config(&MemoryConfig::default())
    }
}
