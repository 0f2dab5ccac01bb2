use serde::{Deserialize, Serialize};
use crate::{AgoraError, Result};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgoraConfig {
    pub llm: LlmConfig,
    pub memory: MemoryConfig,
    pub pipeline: PipelineConfig,
    pub learning: LearningConfig,
    pub system_prompt: String,
}

impl Default for AgoraConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            memory: MemoryConfig::default(),
            pipeline: PipelineConfig::default(),
            learning: LearningConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl AgoraConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject configurations that cannot work before any model call is made.
    pub fn validate(&self) -> Result<()> {
        if self.llm.provider.requires_api_key() && self.llm.api_key.trim().is_empty() {
            return Err(AgoraError::Config(format!(
                "no API key configured for provider {}",
                self.llm.provider.label()
            )));
        }
        if self.llm.provider == LlmProvider::Custom && self.llm.api_base.is_none() {
            return Err(AgoraError::Config(
                "custom provider requires api_base".to_string(),
            ));
        }
        if self.memory.long_term_capacity == 0 {
            return Err(AgoraError::Config(
                "memory.long_term_capacity must be at least 1".to_string(),
            ));
        }
        if self.learning.max_lessons == 0 {
            return Err(AgoraError::Config(
                "learning.max_lessons must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub api_base: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            model: "gpt-4o-mini".to_string(),
            api_key: String::new(),
            api_base: None,
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

impl LlmConfig {
    pub fn base_url(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }

    pub fn generation(&self) -> GenerationParams {
        GenerationParams {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Per-call sampling limits passed along with every completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        LlmConfig::default().generation()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    DeepSeek,
    OpenAI,
    Anthropic,
    /// Any OpenAI-compatible endpoint; `api_base` must be set.
    Custom,
    /// Deterministic offline model, no network.
    Scripted,
}

impl LlmProvider {
    pub fn default_base_url(&self) -> &str {
        match self {
            LlmProvider::DeepSeek => "https://api.deepseek.com",
            LlmProvider::OpenAI => "https://api.openai.com",
            LlmProvider::Anthropic => "https://api.anthropic.com",
            LlmProvider::Custom | LlmProvider::Scripted => "",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LlmProvider::Custom | LlmProvider::Scripted)
    }

    pub fn all() -> &'static [LlmProvider] {
        &[
            LlmProvider::DeepSeek,
            LlmProvider::OpenAI,
            LlmProvider::Anthropic,
            LlmProvider::Custom,
            LlmProvider::Scripted,
        ]
    }

    pub fn label(&self) -> &str {
        match self {
            LlmProvider::DeepSeek => "DeepSeek",
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::Anthropic => "Anthropic",
            LlmProvider::Custom => "Custom",
            LlmProvider::Scripted => "Scripted",
        }
    }
}

/// Session memory tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Inputs longer than this many characters are kept in long-term memory.
    pub retention_threshold: usize,
    pub long_term_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            retention_threshold: 20,
            long_term_capacity: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { timeout_secs: 300 }
    }
}

impl PipelineConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub max_lessons: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self { max_lessons: 10 }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant with memory of earlier \
conversations. Use what you remember about the user to keep answers consistent and personal.";
