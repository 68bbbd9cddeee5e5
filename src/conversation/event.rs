//! Events that drive the conversation

use super::message::{Reply, Turn};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Bootstrap events
    HistoryLoaded {
        turns: Vec<Turn>,
    },
    HistoryUnavailable {
        reason: String,
    },

    // User events
    PromptSubmitted {
        text: String,
    },

    // Generation events
    GenerationSucceeded {
        reply: Reply,
    },
    GenerationFailed {
        reason: String,
    },
}

impl Event {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            Event::HistoryLoaded { .. } => "history_loaded",
            Event::HistoryUnavailable { .. } => "history_unavailable",
            Event::PromptSubmitted { .. } => "prompt_submitted",
            Event::GenerationSucceeded { .. } => "generation_succeeded",
            Event::GenerationFailed { .. } => "generation_failed",
        }
    }
}
