//! Effects produced by state transitions

use std::fmt;

/// Which collaborator a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Bootstrap,
    Generation,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Bootstrap => write!(f, "bootstrap"),
            FailureStage::Generation => write!(f, "generation"),
        }
    }
}

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the generation service for a reply to this prompt
    RequestGeneration { prompt: String },

    /// A collaborator failure was folded into the thread; record why
    ReportFailure { stage: FailureStage, reason: String },
}

impl Effect {
    pub fn request_generation(prompt: impl Into<String>) -> Self {
        Effect::RequestGeneration {
            prompt: prompt.into(),
        }
    }

    pub fn report_failure(stage: FailureStage, reason: impl Into<String>) -> Self {
        Effect::ReportFailure {
            stage,
            reason: reason.into(),
        }
    }
}
