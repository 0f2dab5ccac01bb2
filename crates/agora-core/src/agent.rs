//! Agent personas.
//!
//! An agent is a prompt template and nothing more: name, role and skills
//! become a system instruction, and every call is delegated to the model.

use agora_types::{
    Result,
    config::GenerationParams,
    message::Message,
};
use crate::ports::{ChatRequest, LlmPort};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    name: String,
    role: String,
    skills: Vec<String>,
}

impl Agent {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        role: impl Into<String>,
        skills: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            skills: skills.into_iter().map(Into::into).collect(),
        }
    }

    pub fn history_researcher() -> Self {
        Self::new(
            "History Research Agent",
            "Explore historical events and societal changes",
            [
                "Deep knowledge of historical events",
                "Understanding of historical contexts",
                "Identifying historical trends",
            ],
        )
    }

    pub fn data_analyst() -> Self {
        Self::new(
            "Data Analysis Agent",
            "Interpret numerical data and statistics",
            [
                "Data interpretation",
                "Statistical analysis",
                "Data visualization description",
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn system_instruction(&self) -> String {
        format!(
            "You are {}, an AI agent. Your role: {}. Your skills: {}. \
             Respond based on your role and skills, building on what the other agents have said.",
            self.name,
            self.role,
            self.skills.join(", ")
        )
    }

    /// Ask the model to handle `task` as this agent, given the shared context.
    pub async fn process(
        &self,
        task: &str,
        context: &[Message],
        llm: &dyn LlmPort,
        params: &GenerationParams,
    ) -> Result<String> {
        let req = ChatRequest::compose(&self.system_instruction(), context, task, params);
        log::debug!("{} processing with {} context turns", self.name, context.len());
        let response = llm.chat_completion(req).await?;
        Ok(response.message.content)
    }
}
