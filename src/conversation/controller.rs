//! Conversation controller
//!
//! Owns the conversation state and mediates every change to it. State lives in
//! a `watch` channel: each applied transition replaces the snapshot in one
//! step, so readers never observe a half-applied change.

use super::effect::{Effect, FailureStage};
use super::transition::{transition, TransitionError};
use super::{ConversationState, Event};
use crate::client::{GenerationService, HistoryStore};
use tokio::sync::watch;

/// What happened to a submitted prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing changed and no request was made
    Ignored(TransitionError),
    /// A user turn and its assistant turn were appended
    Completed,
}

/// Owns the message history and the in-flight request flag
pub struct ConversationController<H, G>
where
    H: HistoryStore,
    G: GenerationService,
{
    history_store: H,
    generator: G,
    state_tx: watch::Sender<ConversationState>,
}

impl<H, G> ConversationController<H, G>
where
    H: HistoryStore,
    G: GenerationService,
{
    pub fn new(history_store: H, generator: G) -> Self {
        let (state_tx, _) = watch::channel(ConversationState::new());
        Self {
            history_store,
            generator,
            state_tx,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> ConversationState {
        self.state_tx.borrow().clone()
    }

    /// Receive a new snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state_tx.subscribe()
    }

    /// Seed the history from the history store.
    ///
    /// Afterwards the history is never empty: it holds the fetched turns, a
    /// welcome message, or a single connection-failure message.
    pub async fn bootstrap(&self) {
        if self.state_tx.borrow().bootstrapped {
            tracing::debug!("Ignoring bootstrap, conversation already bootstrapped");
            return;
        }

        let event = match self.history_store.fetch_history().await {
            Ok(turns) => Event::HistoryLoaded { turns },
            Err(e) => Event::HistoryUnavailable { reason: e.message },
        };

        if let Err(e) = self.process(event).await {
            tracing::debug!(reason = %e, "Bootstrap result discarded");
        }
    }

    /// Submit a prompt and wait for its reply to be folded into the history.
    ///
    /// Blank prompts and prompts sent while another one is pending are
    /// ignored. Generation failures become an assistant message, never an
    /// error.
    pub async fn submit_prompt(&self, prompt_text: &str) -> SubmitOutcome {
        let event = Event::PromptSubmitted {
            text: prompt_text.to_string(),
        };
        match self.process(event).await {
            Ok(()) => SubmitOutcome::Completed,
            Err(e) => {
                tracing::debug!(reason = %e, "Prompt ignored");
                SubmitOutcome::Ignored(e)
            }
        }
    }

    /// Run an event and every event its effects produce
    async fn process(&self, event: Event) -> Result<(), TransitionError> {
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let name = current_event.name();
            let effects = self.apply(current_event)?;
            tracing::debug!(event = name, effects = effects.len(), "Applied transition");

            for effect in effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        Ok(())
    }

    /// Apply one transition to the shared state.
    ///
    /// The check and the write happen inside one `send_if_modified` call, so
    /// two racing submissions cannot both pass the pending gate.
    fn apply(&self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let mut outcome = Ok(Vec::new());
        self.state_tx
            .send_if_modified(|state| match transition(state, event) {
                Ok(result) => {
                    *state = result.new_state;
                    outcome = Ok(result.effects);
                    true
                }
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            });
        outcome
    }

    /// Execute an effect and optionally return a generated event
    async fn execute_effect(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::RequestGeneration { prompt } => {
                let guard = PendingGuard::new(self);
                let event = match self.generator.generate(&prompt).await {
                    Ok(reply) => Event::GenerationSucceeded { reply },
                    Err(e) => Event::GenerationFailed { reason: e.message },
                };
                guard.disarm();
                Some(event)
            }

            Effect::ReportFailure { stage, reason } => {
                match stage {
                    FailureStage::Bootstrap => {
                        tracing::warn!(reason = %reason, "History unavailable, showing connection error");
                    }
                    FailureStage::Generation => {
                        tracing::warn!(reason = %reason, "Generation failed, showing error message");
                    }
                }
                None
            }
        }
    }

    /// Fold an interrupted request into the history.
    ///
    /// Runs when a generation future is dropped before it resolves or unwinds
    /// with a panic; the user message still gets exactly one answer.
    fn abandon_request(&self, reason: &str) {
        let event = Event::GenerationFailed {
            reason: reason.to_string(),
        };
        match self.apply(event) {
            Ok(_) => tracing::warn!(reason, "Generation request abandoned"),
            Err(e) => tracing::debug!(reason = %e, "Abandoned request already resolved"),
        }
    }
}

/// Clears `pending` if a generation request never reaches its outcome event
struct PendingGuard<'a, H, G>
where
    H: HistoryStore,
    G: GenerationService,
{
    controller: &'a ConversationController<H, G>,
    armed: bool,
}

impl<'a, H, G> PendingGuard<'a, H, G>
where
    H: HistoryStore,
    G: GenerationService,
{
    fn new(controller: &'a ConversationController<H, G>) -> Self {
        Self {
            controller,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<H, G> Drop for PendingGuard<'_, H, G>
where
    H: HistoryStore,
    G: GenerationService,
{
    fn drop(&mut self) {
        if self.armed {
            let reason = if std::thread::panicking() {
                "generation panicked"
            } else {
                "generation request dropped before completing"
            };
            self.controller.abandon_request(reason);
        }
    }
}
