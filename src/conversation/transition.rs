//! Pure state transition function
//!
//! Given the same state and event this always produces the same result; all
//! I/O happens in the controller when it executes the returned effects.

use super::effect::FailureStage;
use super::message::{Message, CONNECTION_FAILED_TEXT, GENERATION_FAILED_TEXT, WELCOME_TEXT};
use super::{ConversationState, Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Reasons an event is rejected. A rejected event leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("A generation request is already pending")]
    RequestPending,
    #[error("Conversation has not been bootstrapped yet")]
    NotBootstrapped,
    #[error("Conversation was already bootstrapped")]
    AlreadyBootstrapped,
    #[error("No generation request is pending")]
    NoRequestPending,
}

/// Pure transition function
pub fn transition(
    state: &ConversationState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // ============================================================
        // Bootstrap
        // ============================================================
        Event::HistoryLoaded { .. } | Event::HistoryUnavailable { .. } if state.bootstrapped => {
            Err(TransitionError::AlreadyBootstrapped)
        }

        // A stored turn without text makes the whole history unusable
        Event::HistoryLoaded { turns } if turns.iter().any(|t| t.text.trim().is_empty()) => {
            Ok(fail_bootstrap(
                state,
                "History store returned a turn without text".to_string(),
            ))
        }

        Event::HistoryLoaded { turns } => {
            let mut next = state.clone();
            for turn in turns {
                let id = next.ids.allocate();
                next.history.push(turn.into_message(id));
            }
            if next.history.is_empty() {
                let id = next.ids.allocate();
                next.history.push(Message::assistant(id, WELCOME_TEXT, None));
            }
            next.bootstrapped = true;
            Ok(TransitionResult::new(next))
        }

        Event::HistoryUnavailable { reason } => Ok(fail_bootstrap(state, reason)),

        // ============================================================
        // User prompt
        // ============================================================
        Event::PromptSubmitted { text } => {
            let prompt = text.trim();
            if prompt.is_empty() {
                return Err(TransitionError::EmptyPrompt);
            }
            if state.pending {
                return Err(TransitionError::RequestPending);
            }
            if !state.bootstrapped {
                return Err(TransitionError::NotBootstrapped);
            }

            let mut next = state.clone();
            let id = next.ids.allocate();
            next.history.push(Message::user(id, prompt));
            next.pending = true;
            Ok(TransitionResult::new(next).with_effect(Effect::request_generation(prompt)))
        }

        // ============================================================
        // Generation outcome
        // ============================================================
        Event::GenerationSucceeded { .. } | Event::GenerationFailed { .. } if !state.pending => {
            Err(TransitionError::NoRequestPending)
        }

        // A reply without text is as good as no reply
        Event::GenerationSucceeded { reply } if reply.text.trim().is_empty() => Ok(fail_generation(
            state,
            "Generation service returned an empty reply".to_string(),
        )),

        Event::GenerationSucceeded { reply } => {
            let mut next = state.clone();
            let id = next.ids.allocate();
            let image_url = reply.image_url.filter(|url| !url.trim().is_empty());
            next.history.push(Message::assistant(id, reply.text, image_url));
            next.pending = false;
            Ok(TransitionResult::new(next))
        }

        Event::GenerationFailed { reason } => Ok(fail_generation(state, reason)),
    }
}

/// Replace the history with the single connection-failure message
fn fail_bootstrap(state: &ConversationState, reason: String) -> TransitionResult {
    let mut next = state.clone();
    let id = next.ids.allocate();
    next.history = vec![Message::assistant(id, CONNECTION_FAILED_TEXT, None)];
    next.bootstrapped = true;
    TransitionResult::new(next).with_effect(Effect::report_failure(FailureStage::Bootstrap, reason))
}

/// Fold a failed generation into the thread as an assistant message
fn fail_generation(state: &ConversationState, reason: String) -> TransitionResult {
    let mut next = state.clone();
    let id = next.ids.allocate();
    next.history.push(Message::assistant(id, GENERATION_FAILED_TEXT, None));
    next.pending = false;
    TransitionResult::new(next).with_effect(Effect::report_failure(FailureStage::Generation, reason))
}
