//! OpenAI-compatible LLM adapter.
//!
//! Works with OpenAI, DeepSeek and any provider exposing the OpenAI chat
//! completions API. Failures are classified, never retried:
//! connection problems, HTTP 429 and 5xx are transient; everything else the
//! endpoint rejects is an invalid request.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use agora_core::ports::*;
use agora_types::{
    Result, AgoraError,
    config::LlmConfig,
    message::Message,
};

pub struct OpenAiCompatProvider {
    client: Client,
    config: LlmConfig,
    base_url: String,
}

impl OpenAiCompatProvider {
    pub fn new(config: LlmConfig) -> Self {
        let base_url = config.base_url().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            config,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request_body(&self, req: &ChatRequest) -> Value {
        let messages: Vec<Value> = req.messages.iter().map(message_to_json).collect();
        json!({
            "model": req.model,
            "messages": messages,
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        })
    }
}

#[async_trait(?Send)]
impl LlmPort for OpenAiCompatProvider {
    async fn chat_completion(&self, req: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&req);
        log::debug!("POST {} ({} messages)", url, req.messages.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(status_error(status, &text));
        }

        let data: ApiResponse = response
            .json()
            .await
            .map_err(|e| AgoraError::InvalidRequest(format!("unreadable response: {}", e)))?;

        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgoraError::InvalidRequest("No choices in response".to_string()))?;

        let usage = data.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        if let Some(ref u) = usage {
            log::debug!("token usage: {} total", u.total_tokens);
        }

        Ok(ChatResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            usage,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, ""));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| AgoraError::InvalidRequest(e.to_string()))?;

        let models = data["data"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// ─── Helpers ─────────────────────────────────────────────────

pub(crate) fn message_to_json(msg: &Message) -> Value {
    json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    })
}

pub(crate) fn status_error(status: StatusCode, body: &str) -> AgoraError {
    let message = if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body)
    };
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        AgoraError::Transient(message)
    } else {
        AgoraError::InvalidRequest(message)
    }
}

fn send_error(e: reqwest::Error) -> AgoraError {
    if e.is_builder() {
        AgoraError::InvalidRequest(e.to_string())
    } else {
        AgoraError::Transient(e.to_string())
    }
}
