//! Conversation state

use super::message::{IdAllocator, Message, Role};
use serde::Serialize;

/// Everything the presentation layer needs to render the thread.
///
/// Owned by the controller and only ever replaced as a whole, so a clone is a
/// consistent snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationState {
    /// Finalized messages, oldest first
    pub history: Vec<Message>,
    /// A generation request is outstanding
    pub pending: bool,
    /// Bootstrap has completed (successfully or with the fallback message)
    pub bootstrapped: bool,
    #[serde(skip)]
    pub(crate) ids: IdAllocator,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            pending: false,
            bootstrapped: false,
            ids: IdAllocator::new(),
        }
    }

    /// Check whether a new prompt would be accepted
    pub fn accepts_prompts(&self) -> bool {
        self.bootstrapped && !self.pending
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.history.iter().filter(|m| m.role == role).count()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
