//! Configuration loading: optional JSON file, then command-line and
//! environment overrides, then validation.

use std::path::Path;

use agora_types::{
    AgoraError, Result,
    config::{AgoraConfig, LlmProvider},
};

#[derive(Debug, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub provider: Option<LlmProvider>,
    pub model: Option<String>,
}

pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<AgoraConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                AgoraError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            log::debug!("loaded config from {}", path.display());
            AgoraConfig::from_json(&text)?
        }
        None => AgoraConfig::default(),
    };
    resolve(config, overrides)
}

pub fn resolve(mut config: AgoraConfig, overrides: Overrides) -> Result<AgoraConfig> {
    if let Some(provider) = overrides.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = overrides.model {
        config.llm.model = model;
    }
    if let Some(key) = overrides.api_key {
        config.llm.api_key = key;
    }
    config.validate()?;
    Ok(config)
}
