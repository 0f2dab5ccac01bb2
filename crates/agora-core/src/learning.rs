//! Reflective learning loop.
//!
//! After answering, the agent asks the model to critique its own answer and
//! keeps the critique as a lesson. Lessons are fed back into every later
//! prompt. The lesson list is capped and evicts oldest first.

use std::collections::VecDeque;

use agora_types::{
    Result,
    config::{AgoraConfig, GenerationParams},
    event::AgoraEvent,
    message::Message,
};
use crate::event_bus::EventBus;
use crate::ports::{ChatRequest, LlmPort};

const REFLECTION_PERSONA: &str = "You review an assistant's answers and extract short, \
reusable lessons that would make future answers better.";

pub struct LearningLoop {
    persona: String,
    params: GenerationParams,
    lessons: VecDeque<String>,
    max_lessons: usize,
    event_bus: EventBus,
}

impl LearningLoop {
    pub fn new(config: &AgoraConfig, event_bus: EventBus) -> Self {
        Self {
            persona: config.system_prompt.clone(),
            params: config.llm.generation(),
            lessons: VecDeque::new(),
            max_lessons: config.learning.max_lessons,
            event_bus,
        }
    }

    pub fn lessons(&self) -> Vec<String> {
        self.lessons.iter().cloned().collect()
    }

    fn lesson_context(&self) -> Vec<Message> {
        if self.lessons.is_empty() {
            return Vec::new();
        }
        let listed: Vec<String> = self
            .lessons
            .iter()
            .enumerate()
            .map(|(i, l)| format!("{}. {}", i + 1, l))
            .collect();
        vec![Message::system(format!(
            "Lessons learned from earlier answers:\n{}",
            listed.join("\n")
        ))]
    }

    /// Answer `input` with every current lesson in the prompt.
    pub async fn respond(&self, input: &str, llm: &dyn LlmPort) -> Result<String> {
        let req = ChatRequest::compose(&self.persona, &self.lesson_context(), input, &self.params);
        let response = llm.chat_completion(req).await?;
        Ok(response.message.content)
    }

    /// Ask the model for one lesson about this exchange and keep it.
    /// Returns the stored lesson, or `None` if the model had nothing to say.
    pub async fn reflect(
        &mut self,
        input: &str,
        response: &str,
        llm: &dyn LlmPort,
    ) -> Result<Option<String>> {
        let prompt = format!(
            "User input: {}\nAssistant response: {}\n\n\
             Reflect on this exchange. What could be improved next time? \
             Answer with a single concise lesson.",
            input, response
        );
        let req = ChatRequest::compose(REFLECTION_PERSONA, &[], &prompt, &self.params);
        let reflection = llm.chat_completion(req).await?;
        let lesson = reflection.message.content.trim().to_string();
        if lesson.is_empty() {
            log::debug!("empty reflection, nothing learned");
            return Ok(None);
        }

        self.lessons.push_back(lesson.clone());
        while self.lessons.len() > self.max_lessons {
            self.lessons.pop_front();
        }
        log::info!("learned lesson #{}", self.lessons.len());
        self.event_bus.emit(AgoraEvent::LessonLearned {
            lesson: lesson.clone(),
        });
        Ok(Some(lesson))
    }

    pub async fn respond_and_learn(&mut self, input: &str, llm: &dyn LlmPort) -> Result<String> {
        let response = self.respond(input, llm).await?;
        self.reflect(input, &response, llm).await?;
        Ok(response)
    }
}
