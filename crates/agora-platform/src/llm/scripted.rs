//! Deterministic offline model.
//!
//! Replays queued replies in order. Once the queue is empty it echoes the
//! last user message, so demos keep working without network access.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use agora_core::ports::*;
use agora_types::{Result, AgoraError, message::Message};

pub struct ScriptedLlm {
    replies: RefCell<VecDeque<Result<String>>>,
    calls: Cell<usize>,
}

impl ScriptedLlm {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: RefCell::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Cell::new(0),
        }
    }

    /// Queue a failure to be returned by the next unanswered call.
    pub fn push_error(&self, error: AgoraError) {
        self.replies.borrow_mut().push_back(Err(error));
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.borrow_mut().push_back(Ok(reply.into()));
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

#[async_trait(?Send)]
impl LlmPort for ScriptedLlm {
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse> {
        self.calls.set(self.calls.get() + 1);
        let text = match self.replies.borrow_mut().pop_front() {
            Some(reply) => reply?,
            None => format!("You said: {}", req.last_user_text().unwrap_or_default()),
        };
        Ok(ChatResponse {
            message: Message::assistant(text),
            usage: None,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(vec!["scripted".to_string()])
    }
}
