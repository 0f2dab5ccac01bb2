pub(crate) mod openai_compat;
mod scripted;

pub use openai_compat::OpenAiCompatProvider;
pub use scripted::ScriptedLlm;

use std::rc::Rc;
use agora_core::ports::LlmPort;
use agora_types::config::{LlmConfig, LlmProvider};

/// Pick the adapter matching the configured provider.
pub fn provider_for(config: &LlmConfig) -> Rc<dyn LlmPort> {
    match config.provider {
        LlmProvider::Scripted => {
            log::info!("LLM backend: scripted (offline)");
            Rc::new(ScriptedLlm::new(Vec::<String>::new()))
        }
        _ => {
            log::info!("LLM backend: {} ({})", config.provider.label(), config.model);
            Rc::new(OpenAiCompatProvider::new(config.clone()))
        }
    }
}
