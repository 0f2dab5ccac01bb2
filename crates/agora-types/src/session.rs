use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use crate::message::{Exchange, Message};

/// Generate a fresh opaque session key.
pub fn new_session_key() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// One logical conversation: full turn history plus the capped
/// long-term window of exchanges worth remembering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub history: Vec<Message>,
    pub long_term: VecDeque<Exchange>,
    pub created_at: String,
    pub updated_at: String,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: id.into(),
            history: Vec::new(),
            long_term: VecDeque::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn push_turn(&mut self, message: Message) {
        self.history.push(message);
        self.touch();
    }

    /// Append an exchange, then evict from the front until at most
    /// `capacity` remain. Returns the evicted exchanges, oldest first.
    pub fn remember(&mut self, exchange: Exchange, capacity: usize) -> Vec<Exchange> {
        self.long_term.push_back(exchange);
        let mut evicted = Vec::new();
        while self.long_term.len() > capacity {
            if let Some(old) = self.long_term.pop_front() {
                evicted.push(old);
            }
        }
        self.touch();
        evicted
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.long_term.clear();
        self.touch();
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            updated_at: self.updated_at.clone(),
            message_count: self.history.len(),
            long_term_count: self.long_term.len(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

/// Summary of a session for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub updated_at: String,
    pub message_count: usize,
    pub long_term_count: usize,
}
