use serde::{Deserialize, Serialize};

/// Events emitted by the chat runtime, the pipeline and the learning loop.
/// Front ends drain these to report progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgoraEvent {
    /// A chat turn started for a session
    TurnStart { session_id: String, turn_id: u64 },

    /// The turn completed and both memory tiers were updated
    TurnEnd { session_id: String, turn_id: u64 },

    /// An exchange was admitted to long-term memory
    MemoryAdmitted { session_id: String },

    /// Exchanges pushed out of long-term memory by newer ones
    MemoryEvicted { session_id: String, count: usize },

    PipelineStart { task: String, steps: usize },

    StepStart { index: usize, step: String, agent: String },

    StepEnd { index: usize, step: String },

    /// The budget ran out before `next_step` could start
    PipelineTimeout { next_step: usize },

    PipelineFailed { step: String, message: String },

    PipelineComplete { steps_run: usize },

    LessonLearned { lesson: String },

    /// An error occurred
    Error { message: String },
}
