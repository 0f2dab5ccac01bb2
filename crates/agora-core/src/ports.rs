//! Port traits: the boundary to the hosted model.
//!
//! The core only depends on these traits. Implementations live in
//! `agora-platform` (HTTP and scripted adapters) or in tests.

use async_trait::async_trait;
use agora_types::{
    Result,
    config::GenerationParams,
    message::{Message, Role},
};

// ─── LLM Port ────────────────────────────────────────────────

/// Request to send to an LLM
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>, params: &GenerationParams) -> Self {
        Self {
            messages,
            model: params.model.clone(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        }
    }

    /// Persona first, then prior turns in order, then the new user message.
    pub fn compose(
        persona: &str,
        history: &[Message],
        user_message: &str,
        params: &GenerationParams,
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(persona));
        messages.extend_from_slice(history);
        messages.push(Message::user(user_message));
        Self::new(messages, params)
    }

    /// Content of the trailing user message, if any.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Complete (non-streaming) response from an LLM
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub message: Message,
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    pub fn text(&self) -> &str {
        self.message.as_text()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The remote model. Calls may fail with `AgoraError::Transient` or
/// `AgoraError::InvalidRequest` and may take arbitrarily long; nothing in
/// the core retries them.
#[async_trait(?Send)]
pub trait LlmPort {
    /// Non-streaming chat completion
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse>;

    /// List available models for this provider
    async fn list_models(&self) -> Result<Vec<String>>;
}
