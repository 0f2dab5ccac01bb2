//! Adapters for the `agora-core` ports.

pub mod llm;
