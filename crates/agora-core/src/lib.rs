//! Core of Agora: session memory, turn orchestration, the reflective
//! learning loop and the fixed-pipeline agent orchestrator.
//!
//! Everything here talks to the outside world through [`ports::LlmPort`];
//! adapters live in `agora-platform`.

pub mod agent;
pub mod chat;
pub mod event_bus;
pub mod learning;
pub mod memory;
pub mod pipeline;
pub mod ports;
