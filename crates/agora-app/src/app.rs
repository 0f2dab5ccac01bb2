//! Application state. Owns the adapters and the core services and
//! reports core events through the logger.

use std::rc::Rc;
use std::time::Duration;

use agora_core::agent::Agent;
use agora_core::chat::ChatRuntime;
use agora_core::event_bus::EventBus;
use agora_core::learning::LearningLoop;
use agora_core::memory::SessionStore;
use agora_core::pipeline::Pipeline;
use agora_core::ports::LlmPort;
use agora_platform::llm::provider_for;
use agora_types::{Result, config::AgoraConfig, event::AgoraEvent};

pub struct App {
    config: AgoraConfig,
    event_bus: EventBus,
    llm: Rc<dyn LlmPort>,
    chat: ChatRuntime,
    learner: LearningLoop,
}

impl App {
    pub fn new(config: AgoraConfig) -> Self {
        Self::with_llm(config.clone(), provider_for(&config.llm))
    }

    pub fn with_llm(config: AgoraConfig, llm: Rc<dyn LlmPort>) -> Self {
        let event_bus = EventBus::new();
        let store = SessionStore::from_config(&config.memory);
        let chat = ChatRuntime::new(&config, store, event_bus.clone());
        let learner = LearningLoop::new(&config, event_bus.clone());
        Self {
            config,
            event_bus,
            llm,
            chat,
            learner,
        }
    }

    pub async fn ask(&mut self, session: &str, input: &str) -> Result<String> {
        let result = self.chat.chat(session, input, self.llm.as_ref()).await;
        self.report_events();
        result
    }

    pub fn memory(&self, session: &str) -> String {
        let text = self.chat.store().render_long_term(session);
        if text.is_empty() {
            "(nothing remembered yet)".to_string()
        } else {
            text
        }
    }

    pub fn reset(&mut self, session: &str) {
        if !self.chat.reset(session) {
            log::debug!("reset of unknown session {}", session);
        }
    }

    pub async fn solve(&self, task: &str, timeout: Option<Duration>) -> String {
        let pipeline = Pipeline::research_collaboration(
            Agent::history_researcher(),
            Agent::data_analyst(),
            self.config.llm.generation(),
            self.event_bus.clone(),
        );
        let budget = timeout.unwrap_or_else(|| self.config.pipeline.timeout());
        let answer = pipeline.solve(task, budget, self.llm.as_ref()).await;
        self.report_events();
        answer
    }

    pub async fn learn(&mut self, input: &str) -> Result<String> {
        let result = self.learner.respond_and_learn(input, self.llm.as_ref()).await;
        self.report_events();
        result
    }

    pub fn lessons(&self) -> Vec<String> {
        self.learner.lessons()
    }

    /// Drain pending events into the log.
    fn report_events(&self) {
        let events = self.event_bus.drain();
        for event in events {
            match event {
                AgoraEvent::StepStart { index, step, agent } => {
                    log::info!("step {} ({}) started by {}", index + 1, step, agent)
                }
                AgoraEvent::PipelineTimeout { next_step } => {
                    log::warn!("pipeline timed out before step {}", next_step + 1)
                }
                AgoraEvent::PipelineFailed { step, message } => {
                    log::warn!("pipeline failed in {}: {}", step, message)
                }
                AgoraEvent::MemoryEvicted { session_id, count } => {
                    log::info!("session {}: {} memories evicted", session_id, count)
                }
                AgoraEvent::LessonLearned { lesson } => log::info!("lesson learned: {}", lesson),
                AgoraEvent::Error { message } => log::error!("{}", message),
                other => log::debug!("{:?}", other),
            }
        }
    }
}
