//! Pipeline orchestrator and end-to-end memory scenarios.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use agora_core::agent::Agent;
use agora_core::chat::ChatRuntime;
use agora_core::event_bus::EventBus;
use agora_core::memory::SessionStore;
use agora_core::pipeline::*;
use agora_core::ports::*;
use agora_types::config::{AgoraConfig, GenerationParams};
use agora_types::event::AgoraEvent;
use agora_types::message::*;
use agora_types::AgoraError;
use async_trait::async_trait;
use futures::executor::block_on;

const AMPLE: Duration = Duration::from_secs(60);

// ─── Mocks ───────────────────────────────────────────────

/// Numbers its replies and optionally sleeps before answering.
struct CountingLlm {
    calls: Cell<usize>,
    delay: Duration,
}

impl CountingLlm {
    fn new() -> Self {
        Self { calls: Cell::new(0), delay: Duration::ZERO }
    }

    fn slow(delay: Duration) -> Self {
        Self { calls: Cell::new(0), delay }
    }
}

#[async_trait(?Send)]
impl LlmPort for CountingLlm {
    async fn chat_completion(&self, req: ChatRequest) -> agora_types::Result<ChatResponse> {
        std::thread::sleep(self.delay);
        self.calls.set(self.calls.get() + 1);
        let asked = req.last_user_text().unwrap_or_default().to_string();
        Ok(ChatResponse {
            message: Message::assistant(format!("reply {} to {}", self.calls.get(), asked)),
            usage: None,
        })
    }

    async fn list_models(&self) -> agora_types::Result<Vec<String>> {
        Ok(vec![])
    }
}

#[derive(Clone, Copy)]
enum Behaviour {
    Append,
    Finish,
    Fail,
}

/// Step action that counts its invocations.
struct Instrumented {
    label: &'static str,
    behaviour: Behaviour,
    calls: Rc<Cell<usize>>,
    seen_context: Rc<RefCell<Vec<usize>>>,
}

#[async_trait(?Send)]
impl StepAction for Instrumented {
    async fn execute(
        &self,
        agent: &Agent,
        _task: &str,
        mut context: Vec<Message>,
        _llm: &dyn LlmPort,
    ) -> agora_types::Result<StepOutcome> {
        self.calls.set(self.calls.get() + 1);
        self.seen_context.borrow_mut().push(context.len());
        match self.behaviour {
            Behaviour::Append => {
                context.push(Message::assistant(format!("{} by {}", self.label, agent.name())));
                Ok(StepOutcome::Continue(context))
            }
            Behaviour::Finish => Ok(StepOutcome::Done(format!("{} finished early", self.label))),
            Behaviour::Fail => Err(AgoraError::Transient(format!("{} lost connection", self.label))),
        }
    }
}

struct Harness {
    pipeline: Pipeline,
    counters: Vec<Rc<Cell<usize>>>,
    seen_context: Rc<RefCell<Vec<usize>>>,
    bus: EventBus,
}

fn harness(behaviours: &[Behaviour]) -> Harness {
    const LABELS: [&str; 5] = ["step1", "step2", "step3", "step4", "step5"];
    let bus = EventBus::new();
    let seen_context = Rc::new(RefCell::new(Vec::new()));
    let mut counters = Vec::new();
    let mut steps = Vec::new();
    for (i, behaviour) in behaviours.iter().enumerate() {
        let calls = Rc::new(Cell::new(0));
        counters.push(calls.clone());
        let agent = if i % 2 == 0 { Agent::history_researcher() } else { Agent::data_analyst() };
        steps.push(PipelineStep::new(
            LABELS[i],
            agent,
            Instrumented {
                label: LABELS[i],
                behaviour: *behaviour,
                calls,
                seen_context: seen_context.clone(),
            },
        ));
    }
    Harness {
        pipeline: Pipeline::new(steps, bus.clone()),
        counters,
        seen_context,
        bus,
    }
}

fn counts(h: &Harness) -> Vec<usize> {
    h.counters.iter().map(|c| c.get()).collect()
}

// ─── Orchestrator Tests ──────────────────────────────────

#[test]
fn zero_timeout_runs_no_step() {
    let h = harness(&[Behaviour::Append; 5]);
    let llm = CountingLlm::new();
    let result = block_on(h.pipeline.solve("task", Duration::ZERO, &llm));
    assert_eq!(result, TIMEOUT_RESULT);
    assert_eq!(counts(&h), vec![0; 5]);
    assert!(h.bus.drain().contains(&AgoraEvent::PipelineTimeout { next_step: 0 }));
}

#[test]
fn failure_in_step_two_aborts_the_rest() {
    let h = harness(&[
        Behaviour::Append,
        Behaviour::Fail,
        Behaviour::Append,
        Behaviour::Append,
        Behaviour::Append,
    ]);
    let llm = CountingLlm::new();
    let result = block_on(h.pipeline.solve("task", AMPLE, &llm));
    assert!(result.starts_with(ERROR_PREFIX));
    assert!(result.contains("step2 lost connection"));
    assert_eq!(counts(&h), vec![1, 1, 0, 0, 0]);

    let events = h.bus.drain();
    assert!(events.iter().any(|e| matches!(e, AgoraEvent::PipelineFailed { step, .. } if step == "step2")));
    assert!(!events.iter().any(|e| matches!(e, AgoraEvent::PipelineComplete { .. })));
}

#[test]
fn all_steps_continue_returns_last_context_entry() {
    let h = harness(&[Behaviour::Append; 5]);
    let llm = CountingLlm::new();
    let result = block_on(h.pipeline.solve("task", AMPLE, &llm));
    assert_eq!(result, "step5 by History Research Agent");
    assert_eq!(counts(&h), vec![1; 5]);
    // each step sees the context left by the previous ones
    assert_eq!(*h.seen_context.borrow(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn done_short_circuits() {
    let h = harness(&[Behaviour::Append, Behaviour::Append, Behaviour::Finish, Behaviour::Append]);
    let llm = CountingLlm::new();
    let result = block_on(h.pipeline.solve("task", AMPLE, &llm));
    assert_eq!(result, "step3 finished early");
    assert_eq!(counts(&h), vec![1, 1, 1, 0]);
    assert!(h.bus.drain().contains(&AgoraEvent::PipelineComplete { steps_run: 3 }));
}

#[test]
fn empty_pipeline_returns_empty_text() {
    let pipeline = Pipeline::new(Vec::new(), EventBus::new());
    assert!(pipeline.is_empty());
    let result = block_on(pipeline.solve("task", AMPLE, &CountingLlm::new()));
    assert_eq!(result, "");
}

#[test]
fn timeout_is_checked_between_steps_only() {
    let bus = EventBus::new();
    let pipeline = Pipeline::research_collaboration(
        Agent::history_researcher(),
        Agent::data_analyst(),
        GenerationParams::default(),
        bus.clone(),
    );
    let llm = CountingLlm::slow(Duration::from_millis(60));
    let result = block_on(pipeline.solve("Why did Rome fall?", Duration::from_millis(30), &llm));
    assert_eq!(result, TIMEOUT_RESULT);
    // the first call ran to completion, nothing after it started
    assert_eq!(llm.calls.get(), 1);
    assert!(bus.drain().contains(&AgoraEvent::PipelineTimeout { next_step: 1 }));
}

#[test]
fn research_collaboration_runs_five_prompted_steps() {
    let bus = EventBus::new();
    let pipeline = Pipeline::research_collaboration(
        Agent::history_researcher(),
        Agent::data_analyst(),
        GenerationParams::default(),
        bus.clone(),
    );
    assert_eq!(pipeline.len(), 5);
    let names: Vec<&str> = pipeline.steps().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names[0], "research_historical_context");
    assert_eq!(names[4], "synthesize_final_answer");

    let llm = CountingLlm::new();
    let result = block_on(pipeline.solve("How did the printing press change Europe?", AMPLE, &llm));
    assert_eq!(llm.calls.get(), 5);
    assert!(result.starts_with("reply 5 to Synthesize"));
    assert!(result.contains("How did the printing press change Europe?"));

    let starts = bus
        .drain()
        .into_iter()
        .filter(|e| matches!(e, AgoraEvent::StepStart { .. }))
        .count();
    assert_eq!(starts, 5);
}

#[test]
fn prompt_step_renders_task() {
    let step = PromptStep::new("Look into: {task}", GenerationParams::default());
    assert_eq!(step.render("tides"), "Look into: tides");
}

// ─── End-to-end Memory Scenario ──────────────────────────

#[test]
fn alice_scenario_keeps_only_the_long_first_turn() {
    let mut rt = ChatRuntime::new(&AgoraConfig::default(), SessionStore::default(), EventBus::new());
    let llm = CountingLlm::new();

    block_on(rt.chat("alice", "Hello! My name is Alice.", &llm)).unwrap();
    block_on(rt.chat("alice", "Hi", &llm)).unwrap();

    assert_eq!(rt.store().history("alice").len(), 4);
    let long_term = rt.store().long_term("alice");
    assert_eq!(long_term.len(), 1);
    assert_eq!(long_term[0].input.content, "Hello! My name is Alice.");
}

#[test]
fn fifo_eviction_after_six_admissions() {
    let mut store = SessionStore::default();
    let inputs: Vec<String> = (1..=6).map(|i| format!("admissible input number {i}")).collect();
    for input in &inputs {
        store.update_long_term("s", input, "noted");
    }
    let kept: Vec<String> = store.long_term("s").into_iter().map(|e| e.input.content).collect();
    assert_eq!(kept, inputs[1..].to_vec());
}
