//! Conversation core
//!
//! Implements the Elm Architecture pattern: a pure transition function over
//! an explicit state, driven by a controller that performs the I/O.

mod controller;
mod effect;
pub mod event;
pub mod message;
mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use controller::{ConversationController, SubmitOutcome};
pub use effect::{Effect, FailureStage};
pub use event::Event;
pub use message::{IdAllocator, Message, MessageId, Reply, Role, Turn};
pub use state::ConversationState;
pub use transition::{transition, TransitionError, TransitionResult};
