//! Fixed-pipeline agent orchestrator.
//!
//! A pipeline is an ordered list of steps, each bound to one agent. `solve`
//! runs them strictly in sequence, threading a shared context through:
//! - the time budget is checked before each step, never during one
//! - a step may finish the pipeline early with [`StepOutcome::Done`]
//! - the first failing step aborts the whole run
//!
//! `solve` always produces text: the answer, [`TIMEOUT_RESULT`], or an
//! error line starting with [`ERROR_PREFIX`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use agora_types::{
    Result,
    config::GenerationParams,
    event::AgoraEvent,
    message::Message,
};
use crate::agent::Agent;
use crate::event_bus::EventBus;
use crate::ports::LlmPort;

pub const TIMEOUT_RESULT: &str = "Timeout: the task took too long to complete.";
pub const ERROR_PREFIX: &str = "Error: ";

/// What a step hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Keep going with the updated shared context
    Continue(Vec<Message>),
    /// Stop here; this is the final answer
    Done(String),
}

/// The work done by one pipeline step.
#[async_trait(?Send)]
pub trait StepAction {
    async fn execute(
        &self,
        agent: &Agent,
        task: &str,
        context: Vec<Message>,
        llm: &dyn LlmPort,
    ) -> Result<StepOutcome>;
}

/// A named step bound to the agent that performs it.
pub struct PipelineStep {
    pub name: String,
    pub agent: Agent,
    pub action: Box<dyn StepAction>,
}

impl PipelineStep {
    pub fn new(name: impl Into<String>, agent: Agent, action: impl StepAction + 'static) -> Self {
        Self {
            name: name.into(),
            agent,
            action: Box::new(action),
        }
    }
}

/// Prompts the agent with a fixed instruction about the task and appends
/// the reply to the shared context.
pub struct PromptStep {
    instruction: String,
    params: GenerationParams,
}

impl PromptStep {
    /// `instruction` may contain `{task}`, replaced by the task text.
    pub fn new(instruction: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            instruction: instruction.into(),
            params,
        }
    }

    pub fn render(&self, task: &str) -> String {
        self.instruction.replace("{task}", task)
    }
}

#[async_trait(?Send)]
impl StepAction for PromptStep {
    async fn execute(
        &self,
        agent: &Agent,
        task: &str,
        mut context: Vec<Message>,
        llm: &dyn LlmPort,
    ) -> Result<StepOutcome> {
        let prompt = self.render(task);
        let reply = agent.process(&prompt, &context, llm, &self.params).await?;
        context.push(Message::assistant(reply));
        Ok(StepOutcome::Continue(context))
    }
}

pub struct Pipeline {
    steps: Vec<PipelineStep>,
    event_bus: EventBus,
}

impl Pipeline {
    pub fn new(steps: Vec<PipelineStep>, event_bus: EventBus) -> Self {
        Self { steps, event_bus }
    }

    /// Five steps alternating between a historian and an analyst:
    /// historical context, data needs, data analysis, trends, synthesis.
    pub fn research_collaboration(
        researcher: Agent,
        analyst: Agent,
        params: GenerationParams,
        event_bus: EventBus,
    ) -> Self {
        let prompt = |instruction: &str| PromptStep::new(instruction, params.clone());
        let steps = vec![
            PipelineStep::new(
                "research_historical_context",
                researcher.clone(),
                prompt("Research the historical context of the following question. \
                        Focus on key events and societal changes: {task}"),
            ),
            PipelineStep::new(
                "identify_data_needs",
                analyst.clone(),
                prompt("Given the historical context above, what data or statistics \
                        would help answer this question: {task}"),
            ),
            PipelineStep::new(
                "historical_data_analysis",
                researcher.clone(),
                prompt("Provide the relevant historical data and statistics for the \
                        data needs identified above, for the question: {task}"),
            ),
            PipelineStep::new(
                "identify_trends",
                analyst.clone(),
                prompt("Analyze the historical data above and identify the key trends \
                        that bear on the question: {task}"),
            ),
            PipelineStep::new(
                "synthesize_final_answer",
                researcher,
                prompt("Synthesize the research, data and trends above into a \
                        comprehensive final answer to: {task}"),
            ),
        ];
        Self::new(steps, event_bus)
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order and return the final answer as text.
    pub async fn solve(&self, task: &str, timeout: Duration, llm: &dyn LlmPort) -> String {
        let start = Instant::now();
        let mut context: Vec<Message> = Vec::new();
        self.event_bus.emit(AgoraEvent::PipelineStart {
            task: task.to_string(),
            steps: self.steps.len(),
        });
        log::info!("solving task with {} steps", self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            if start.elapsed() >= timeout {
                log::warn!("time budget of {:?} spent before step {}", timeout, step.name);
                self.event_bus.emit(AgoraEvent::PipelineTimeout { next_step: index });
                return TIMEOUT_RESULT.to_string();
            }

            self.event_bus.emit(AgoraEvent::StepStart {
                index,
                step: step.name.clone(),
                agent: step.agent.name().to_string(),
            });

            match step.action.execute(&step.agent, task, context, llm).await {
                Ok(StepOutcome::Continue(updated)) => {
                    context = updated;
                    self.event_bus.emit(AgoraEvent::StepEnd {
                        index,
                        step: step.name.clone(),
                    });
                }
                Ok(StepOutcome::Done(result)) => {
                    self.event_bus.emit(AgoraEvent::StepEnd {
                        index,
                        step: step.name.clone(),
                    });
                    self.event_bus.emit(AgoraEvent::PipelineComplete { steps_run: index + 1 });
                    log::info!("step {} finished the task early", step.name);
                    return result;
                }
                Err(e) => {
                    log::warn!("step {} failed: {}", step.name, e);
                    self.event_bus.emit(AgoraEvent::PipelineFailed {
                        step: step.name.clone(),
                        message: e.to_string(),
                    });
                    return format!("{}{}", ERROR_PREFIX, e);
                }
            }
        }

        self.event_bus.emit(AgoraEvent::PipelineComplete { steps_run: self.steps.len() });
        context.pop().map(|m| m.content).unwrap_or_default()
    }
}
