//! Chat runtime: one memory-aware turn at a time.
//!
//! A turn runs in a fixed order:
//! 1. Render long-term memory and the session history into a prompt
//! 2. Call the model
//! 3. On success: record the user turn, then the assistant turn
//! 4. Offer the exchange to long-term memory
//!
//! History is only touched after the model answered, so a failed call
//! never leaves an unanswered user turn behind.

use agora_types::{
    Result,
    config::{AgoraConfig, GenerationParams},
    event::AgoraEvent,
    message::{Message, Role},
};
use crate::event_bus::EventBus;
use crate::memory::{Admission, SessionStore};
use crate::ports::{ChatRequest, LlmPort};

const MEMORY_HEADER: &str = "Long-term memory of earlier conversations:";

pub struct ChatRuntime {
    pub system_prompt: String,
    pub params: GenerationParams,
    pub event_bus: EventBus,
    store: SessionStore,
    turn_counter: u64,
}

impl ChatRuntime {
    pub fn new(config: &AgoraConfig, store: SessionStore, event_bus: EventBus) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            params: config.llm.generation(),
            event_bus,
            store,
            turn_counter: 0,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Build the request for `input` without touching any state.
    pub fn compose_request(&self, session_key: &str, input: &str) -> ChatRequest {
        let memory = self.store.render_long_term(session_key);
        let history = self.store.history(session_key);

        let mut context = Vec::with_capacity(history.len() + 1);
        if !memory.is_empty() {
            context.push(Message::system(format!("{}\n{}", MEMORY_HEADER, memory)));
        }
        context.extend_from_slice(history);

        ChatRequest::compose(&self.system_prompt, &context, input, &self.params)
    }

    /// Answer `input` within the session and update both memory tiers.
    ///
    /// Model failures are returned as-is; the session is left exactly as
    /// it was before the call, and an unknown key is not registered.
    pub async fn chat(
        &mut self,
        session_key: &str,
        input: &str,
        llm: &dyn LlmPort,
    ) -> Result<String> {
        self.turn_counter += 1;
        let turn_id = self.turn_counter;
        self.event_bus.emit(AgoraEvent::TurnStart {
            session_id: session_key.to_string(),
            turn_id,
        });

        let req = self.compose_request(session_key, input);
        log::debug!(
            "session {}: turn {} with {} prompt messages",
            session_key,
            turn_id,
            req.messages.len()
        );

        let response = llm.chat_completion(req).await.map_err(|e| {
            log::warn!("session {}: model call failed: {}", session_key, e);
            self.event_bus.emit(AgoraEvent::Error {
                message: e.to_string(),
            });
            e
        })?;

        let reply = response.message.content;
        self.store.record_turn(session_key, Role::User, input);
        self.store.record_turn(session_key, Role::Assistant, reply.clone());

        if let Admission::Admitted { evicted } =
            self.store.update_long_term(session_key, input, &reply)
        {
            self.event_bus.emit(AgoraEvent::MemoryAdmitted {
                session_id: session_key.to_string(),
            });
            if !evicted.is_empty() {
                self.event_bus.emit(AgoraEvent::MemoryEvicted {
                    session_id: session_key.to_string(),
                    count: evicted.len(),
                });
            }
        }

        self.event_bus.emit(AgoraEvent::TurnEnd {
            session_id: session_key.to_string(),
            turn_id,
        });
        Ok(reply)
    }

    /// Clear a session's memory. Returns false if the session was unknown.
    pub fn reset(&mut self, session_key: &str) -> bool {
        self.store.reset(session_key)
    }
}
